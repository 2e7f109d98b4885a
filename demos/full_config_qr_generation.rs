use std::error::Error;

use qrpipe::{Color, ECLevel, QRBuilder};

fn main() -> Result<(), Box<dyn Error>> {
    let data = "This example shows all available configuration options for QR code generation.";

    let qr = QRBuilder::new(data)
        .module_size(6)                           // Pixels per module - defaults to 10
        .border(2)                                // Quiet zone in modules - defaults to 4
        .ec_level(ECLevel::H)                     // Error correction level - defaults to ECLevel::M
        .foreground("#0D47A1".parse::<Color>()?)  // Module color - defaults to black
        .background(Color::new(227, 242, 253))    // Background color - defaults to white
        .build()?;

    std::fs::write("configured_qr.png", qr.to_png()?)?;

    println!("Configured QR code saved to: configured_qr.png");
    println!("QR metadata: {}", qr.metadata());
    print!("{}", qr.render_as_string());

    Ok(())
}
