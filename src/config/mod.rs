//! Configuration: where the store lives.
//!
//! The base directory comes from `--home` / `LRIG_HOME` or the platform data
//! directory. An override record inside it may redirect the store root.

mod overrides;
mod path;

pub use overrides::{
    OVERRIDE_FILE, PUBLISHED_DIR, PathOverride, clear_path_override, override_path,
    read_path_override, resolve_store_root, write_path_override,
};
pub use path::{
    APP_DIR_NAME, default_base_dir, expand_home, home_dir, resolve_base_dir, validate_asset_name,
};
