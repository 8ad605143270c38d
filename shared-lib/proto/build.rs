fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Messages also derive serde so the gateway can map them to and from JSON.
    // Field names follow the protobuf JSON mapping, absent fields take their
    // proto3 default and unknown fields are rejected.
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .message_attribute(".", "#[derive(serde::Serialize, serde::Deserialize)]")
        .message_attribute(
            ".",
            "#[serde(default, rename_all = \"camelCase\", deny_unknown_fields)]",
        )
        .compile_protos(&["proto/greeter.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto");
    Ok(())
}
