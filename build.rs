use std::{env, path::PathBuf};

fn main() {
    // 1) Load optional env files (still supported for convenience)
    let _ = dotenvy::from_filename(".env");
    load_home_env(".clock.env");
    load_home_env(".env");

    // 2) Provide fallbacks so the crate compiles without .env
    let ntp_server = env_or_default("NTP_SERVER", "pool.ntp.org");
    let utc_offset = env_or_default("UTC_OFFSET_MINUTES", "0");
    let dst_region = env_or_default("DST_REGION", "none");

    if !matches!(dst_region.to_ascii_lowercase().as_str(), "none" | "europe") {
        println!("cargo:warning=DST_REGION '{dst_region}' is not supported; DST stays inactive");
    }

    // 3) Expose as compile-time constants
    println!("cargo:rustc-env=NTP_SERVER={ntp_server}");
    println!("cargo:rustc-env=UTC_OFFSET_MINUTES={utc_offset}");
    println!("cargo:rustc-env=DST_REGION={dst_region}");

    // Optional: don't rebuild unless these change
    println!("cargo:rerun-if-env-changed=NTP_SERVER");
    println!("cargo:rerun-if-env-changed=UTC_OFFSET_MINUTES");
    println!("cargo:rerun-if-env-changed=DST_REGION");
    println!("cargo:rerun-if-changed=.env");
}

fn load_home_env(file: &str) {
    let home = match env::var_os("USERPROFILE").or_else(|| env::var_os("HOME")) {
        Some(path) => PathBuf::from(path),
        None => return,
    };
    let path = home.join(file);
    let _ = dotenvy::from_path(&path);
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
