use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use protoc-bin-vendored to avoid needing protoc installed
    std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path().unwrap());

    let proto_dir = PathBuf::from("proto");
    let protos = [proto_dir.join("stateproof.proto")];

    let mut config = prost_build::Config::new();
    config.type_attribute(".", "#[derive(serde::Serialize, serde::Deserialize)]");
    config.type_attribute(".", "#[serde(rename_all = \"snake_case\")]");

    config.compile_protos(&protos, &[&proto_dir])?;

    println!("cargo:rerun-if-changed=proto/stateproof.proto");
    Ok(())
}
