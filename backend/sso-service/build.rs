// Build script for sso-service
// Compiles auth.proto for gRPC server code generation
fn main() {
    println!("cargo:rerun-if-changed=../proto/sso/v1/auth.proto");

    // Use the vendored protoc unless the environment already provides one
    if std::env::var_os("PROTOC").is_none() {
        if let Ok(protoc) = protoc_bin_vendored::protoc_bin_path() {
            std::env::set_var("PROTOC", protoc);
        }
    }

    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .compile_protos(&["../proto/sso/v1/auth.proto"], &["../proto"])
        .expect("Failed to compile auth.proto for sso-service");
}
