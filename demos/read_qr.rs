use std::error::Error;

use qrpipe::{decode_file, Decoded};

fn main() -> Result<(), Box<dyn Error>> {
    let qr_path = std::env::args().nth(1).unwrap_or_else(|| "configured_qr.png".to_string());

    match decode_file(&qr_path)? {
        Decoded::Found(symbol) => {
            println!("Successfully decoded QR code from: {qr_path}");
            println!("Decoded message: {}", symbol.text);
            println!("QR metadata: {}", symbol.metadata);
            if symbol.url_like {
                println!("Looks like a link: {}", symbol.text);
            }
        }
        Decoded::NotFound => println!("No QR code found in the image: {qr_path}"),
    }

    Ok(())
}
