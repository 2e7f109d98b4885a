use std::error::Error;

use qrpipe::QRBuilder;

fn main() -> Result<(), Box<dyn Error>> {
    // Simplest usage - provide only data, all other settings use their defaults
    let qr = QRBuilder::new("Hello, World!").build()?;

    let path = qr.export_filename();
    qr.to_image().save(&path)?;

    println!("Simple QR code saved to: {path}");
    Ok(())
}
