use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=src/api.rs");
    println!("cargo:rerun-if-changed=src/dataset/models.rs");
    println!("cargo:rerun-if-changed=static/index.html");

    // Real document comes from `cargo run --bin generate-openapi`
    let openapi_path = Path::new("openapi.json");

    if !openapi_path.exists() {
        let placeholder = r#"{
  "note": "Run 'cargo run --bin generate-openapi' to write the dashboard API document"
}"#;
        fs::write(openapi_path, placeholder).expect("Failed to create openapi.json placeholder");
    }
}
