// generate_secret.rs
// Utility to generate a new JWT signing secret

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::RngCore;

fn main() {
    println!("Generating new JWT signing secret...\n");

    let mut bytes = [0u8; 48];
    rand::thread_rng().fill_bytes(&mut bytes);
    let secret = STANDARD.encode(bytes);

    println!("✅ Secret generated successfully!\n");
    println!("Add this to your .env file:");
    println!("─────────────────────────────────────────────────");
    println!("JWT_SECRET={}", secret);
    println!("─────────────────────────────────────────────────");
    println!("\n⚠️  IMPORTANT:");
    println!("  • Keep this secret out of version control");
    println!("  • Rotating it signs every user out");
}
