mod manager;

pub use manager::{
    ConfigFile, ConfigManager, DEFAULT_PROMPTS_DIR, ProviderConfig, ResolveOptions, ResolvedConfig,
    VntlConfig, resolve_config,
};
