//! Simple utility to scale and convert an ingredient quantity
//! Usage: cargo run --bin convert_quantity -- <quantity> <from-unit> [to-unit] [scale]

use skm::units::{categorize_unit, convert_quantity, format_quantity, unit_options};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: convert_quantity <quantity> <from-unit> [to-unit] [scale]");
        eprintln!("Example: convert_quantity 500 g kg 2");
        std::process::exit(1);
    }

    let quantity: f64 = args[1].parse()?;
    let from_unit = args[2].as_str();
    let to_unit = args.get(3).map(|s| s.as_str()).unwrap_or(from_unit);
    let scale: f64 = match args.get(4) {
        Some(s) => s.parse()?,
        None => 1.0,
    };

    let converted = convert_quantity(Some(quantity), Some(from_unit), Some(to_unit), scale);

    println!("{} {} (category: {:?})", quantity, from_unit, categorize_unit(Some(from_unit)));
    println!("  scaled x{} -> {} {}", scale, format_quantity(converted), to_unit);
    println!("  unit choices: {:?}", unit_options(Some(from_unit)));

    Ok(())
}
