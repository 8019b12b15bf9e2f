// ABOUTME: Random sample laptops, filters, and scores for exercising the laptop service.
// ABOUTME: Used by the CLI demo commands.

use pcbook_proto::{memory::Unit, Cpu, Filter, Laptop, Memory};
use rand::Rng;

fn pick<R: Rng>(rng: &mut R, items: &[&'static str]) -> &'static str {
    items[rng.gen_range(0..items.len())]
}

fn new_cpu<R: Rng>(rng: &mut R) -> Cpu {
    let brand = pick(rng, &["Intel", "AMD"]);
    let name = if brand == "Intel" {
        pick(
            rng,
            &["Xeon E-2286M", "Core i9-9980HK", "Core i7-9750H", "Core i5-9400F"],
        )
    } else {
        pick(
            rng,
            &["Ryzen 7 PRO 2700U", "Ryzen 5 PRO 3500U", "Ryzen 3 PRO 3200GE"],
        )
    };

    let number_cores = rng.gen_range(2..=8);
    let number_threads = rng.gen_range(number_cores..=12);
    let min_ghz = rng.gen_range(2.0..3.5);
    let max_ghz = rng.gen_range(min_ghz..5.0);

    Cpu {
        brand: brand.to_string(),
        name: name.to_string(),
        number_cores,
        number_threads,
        min_ghz,
        max_ghz,
    }
}

/// A laptop with a fresh UUID and random specs.
pub fn new_laptop() -> Laptop {
    let mut rng = rand::thread_rng();
    let brand = pick(&mut rng, &["Apple", "Dell", "Lenovo"]);
    let name = match brand {
        "Apple" => pick(&mut rng, &["Macbook Air", "Macbook Pro"]),
        "Dell" => pick(&mut rng, &["Latitude", "Vostro", "XPS", "Alienware"]),
        _ => pick(&mut rng, &["Thinkpad X1", "Thinkpad P1", "Thinkpad P53"]),
    };

    Laptop {
        id: uuid::Uuid::new_v4().to_string(),
        brand: brand.to_string(),
        name: name.to_string(),
        cpu: Some(new_cpu(&mut rng)),
        ram: Some(Memory::new(rng.gen_range(4..=64), Unit::Gigabyte)),
        price_usd: rng.gen_range(1500.0..3500.0),
        release_year: rng.gen_range(2015..=2019),
    }
}

/// Search filter from command-line style values.
pub fn new_filter(max_price_usd: f64, min_cpu_cores: u32, min_cpu_ghz: f64, min_ram_gb: u64) -> Filter {
    Filter {
        max_price_usd,
        min_cpu_cores,
        min_cpu_ghz,
        min_ram: Some(Memory::new(min_ram_gb, Unit::Gigabyte)),
    }
}

/// A rating between 1 and 10.
pub fn random_score() -> f64 {
    f64::from(rand::thread_rng().gen_range(1u8..=10))
}
