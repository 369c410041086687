//! Flags a `profiling` build that cannot install the tokio-console layer.

fn main() {
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_PROFILING");
    println!("cargo:rerun-if-env-changed=CARGO_CFG_TOKIO_UNSTABLE");

    let profiling = std::env::var_os("CARGO_FEATURE_PROFILING").is_some();
    let tokio_unstable = std::env::var_os("CARGO_CFG_TOKIO_UNSTABLE").is_some();
    if !profiling || tokio_unstable {
        return;
    }

    println!(
        "cargo:warning=geonav-logger: `profiling` is enabled without `--cfg tokio_unstable`; \
         Logger::init will skip the tokio-console layer (build with RUSTFLAGS=\"--cfg tokio_unstable\")"
    );
}
