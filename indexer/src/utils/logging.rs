use log::{debug, error, info, warn};

/// Initialize the logger
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Log an informational message
pub fn log_info(message: &str) {
    info!("{}", message);
}

/// Log a debug message
pub fn log_debug(message: &str) {
    debug!("{}", message);
}

/// Log a warning message
pub fn log_warning(message: &str) {
    warn!("{}", message);
}

/// Log an error message
pub fn log_error(message: &str) {
    error!("{}", message);
}

/// Log the node and database the indexer talks to
pub fn log_connection_details(rpc_endpoint: &str, network_id: u32) {
    info!("Node endpoint: {} (network {})", rpc_endpoint, network_id);
}
