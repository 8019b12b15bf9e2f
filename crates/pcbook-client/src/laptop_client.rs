// ABOUTME: Laptop service client whose calls go through the auth interceptor.
// ABOUTME: Create, search, upload-image, and rate operations with per-call deadlines.

use std::path::Path;
use std::time::Duration;

use pcbook_auth::AuthInterceptor;
use pcbook_proto::client::LaptopServiceClient;
use pcbook_proto::{
    methods, upload_image_request, CreateLaptopRequest, Filter, ImageInfo, Laptop,
    RateLaptopRequest, RateLaptopResponse, SearchLaptopRequest, UploadImageRequest,
    UploadImageResponse,
};
use tonic::transport::Channel;
use tonic::{Code, Request};
use tracing::{debug, info};

use crate::error::ClientError;

/// Bytes per `chunk_data` message when uploading an image.
pub const IMAGE_CHUNK_SIZE: usize = 1024;

/// Client for `pcbook.LaptopService`.
///
/// Every call is routed through the [`AuthInterceptor`], which decides per
/// method whether an `authorization` header is attached.
#[derive(Debug, Clone)]
pub struct LaptopClient {
    service: LaptopServiceClient<Channel>,
    auth: AuthInterceptor,
    timeout: Duration,
}

impl LaptopClient {
    pub fn new(channel: Channel, auth: AuthInterceptor, timeout: Duration) -> Self {
        Self {
            service: LaptopServiceClient::new(channel),
            auth,
            timeout,
        }
    }

    fn request<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        request.set_timeout(self.timeout);
        request
    }

    /// Store a laptop on the server and return its id.
    pub async fn create_laptop(&self, laptop: Laptop) -> Result<String, ClientError> {
        let laptop_id = laptop.id.clone();
        let request = self.request(CreateLaptopRequest {
            laptop: Some(laptop),
        });

        let mut service = self.service.clone();
        let result = self
            .auth
            .unary(methods::CREATE_LAPTOP, request, |req| async move {
                service.create_laptop(req).await
            })
            .await;

        match result {
            Ok(response) => {
                let id = response.into_inner().id;
                info!(laptop_id = %id, "created laptop");
                Ok(id)
            }
            Err(status) if status.code() == Code::AlreadyExists => {
                Err(ClientError::AlreadyExists(laptop_id))
            }
            Err(status) => Err(status.into()),
        }
    }

    /// Collect all laptops matching `filter`.
    pub async fn search_laptop(&self, filter: Filter) -> Result<Vec<Laptop>, ClientError> {
        debug!(?filter, "search laptop");
        let request = self.request(SearchLaptopRequest {
            filter: Some(filter),
        });

        let mut service = self.service.clone();
        let mut stream = self
            .auth
            .stream(methods::SEARCH_LAPTOP, request, |req| async move {
                service.search_laptop(req).await
            })
            .await?
            .into_inner();

        let mut laptops = Vec::new();
        while let Some(response) = stream.message().await? {
            if let Some(laptop) = response.laptop {
                debug!(laptop_id = %laptop.id, brand = %laptop.brand, "found laptop");
                laptops.push(laptop);
            }
        }
        Ok(laptops)
    }

    /// Upload an image file for a laptop in [`IMAGE_CHUNK_SIZE`] chunks.
    pub async fn upload_image(
        &self,
        laptop_id: &str,
        image_path: &Path,
    ) -> Result<UploadImageResponse, ClientError> {
        let data = tokio::fs::read(image_path)
            .await
            .map_err(|source| ClientError::Image {
                path: image_path.to_path_buf(),
                source,
            })?;
        let image_type = image_path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let messages = upload_messages(laptop_id, &image_type, &data);
        let request = self.request(tokio_stream::iter(messages));

        let mut service = self.service.clone();
        let response = self
            .auth
            .stream(methods::UPLOAD_IMAGE, request, |req| async move {
                service.upload_image(req).await
            })
            .await?
            .into_inner();

        info!(image_id = %response.id, size = response.size, "image uploaded");
        Ok(response)
    }

    /// Send one rating per `(laptop_id, score)` and collect the server's replies.
    pub async fn rate_laptop(
        &self,
        ratings: Vec<(String, f64)>,
    ) -> Result<Vec<RateLaptopResponse>, ClientError> {
        let expected = ratings.len();
        let messages: Vec<RateLaptopRequest> = ratings
            .into_iter()
            .map(|(laptop_id, score)| RateLaptopRequest { laptop_id, score })
            .collect();
        let request = self.request(tokio_stream::iter(messages));

        let mut service = self.service.clone();
        let mut stream = self
            .auth
            .stream(methods::RATE_LAPTOP, request, |req| async move {
                service.rate_laptop(req).await
            })
            .await?
            .into_inner();

        let mut replies = Vec::with_capacity(expected);
        while let Some(reply) = stream.message().await? {
            debug!(
                laptop_id = %reply.laptop_id,
                rated_count = reply.rated_count,
                average_score = reply.average_score,
                "received rating"
            );
            replies.push(reply);
        }
        Ok(replies)
    }
}

/// Image info message followed by the data split into chunks.
pub fn upload_messages(laptop_id: &str, image_type: &str, data: &[u8]) -> Vec<UploadImageRequest> {
    let info = UploadImageRequest {
        data: Some(upload_image_request::Data::Info(ImageInfo {
            laptop_id: laptop_id.to_string(),
            image_type: image_type.to_string(),
        })),
    };

    std::iter::once(info)
        .chain(data.chunks(IMAGE_CHUNK_SIZE).map(|chunk| UploadImageRequest {
            data: Some(upload_image_request::Data::ChunkData(chunk.to_vec())),
        }))
        .collect()
}
