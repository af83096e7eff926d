use std::env;
use std::fs;
use std::path::Path;

// Variables que lee AppConfig::from_env() con option_env!
const CONFIG_KEYS: &[&str] = &[
    "BACKEND_URL",
    "BACKEND_URL_DEVELOPMENT",
    "BACKEND_URL_PRODUCTION",
    "ENVIRONMENT",
    "ENABLE_LOGGING",
    "STORAGE_KEY_PREFIX",
    "SEARCH_DEBOUNCE_MS",
    "DEFAULT_PAGE_LIMIT",
    "QUERY_SENTINELS",
    "AUTH_COOKIE_NAME",
];

fn main() {
    // Cargar variables de entorno desde .env si existe
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                // KEY=VALUE (se aceptan comillas alrededor del valor)
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"');

                    if !CONFIG_KEYS.contains(&key) {
                        println!("cargo:warning=Variable desconocida en .env: {}", key);
                        continue;
                    }
                    // El entorno real tiene prioridad sobre .env
                    if env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value);
                    }
                }
            }
        }
    }

    for key in CONFIG_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=build.rs");
}
