// ABOUTME: Build script for generating Rust code from pcbook.proto.
// ABOUTME: Uses tonic-build to compile the auth and laptop service definitions.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto-src/pcbook.proto"], &["proto-src"])?;

    println!("cargo:rerun-if-changed=proto-src/pcbook.proto");

    Ok(())
}
