//! Logger module
//!
//! Provides logging utilities for the heroes service including:
//! - Server lifecycle logging
//! - Per-request and hero status lines
//! - Access logging with multiple formats
//! - Error and warning logging, optionally to files

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::LogLevel;

use crate::config::Config;
use hyper::{Method, Uri};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        &config.logging.level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log when the level allows it
fn write_at(level: LogLevel, message: &str) {
    match writer::get() {
        Some(w) if !w.enabled(level) => {}
        Some(w) if level <= LogLevel::Warn => w.write_error(message),
        Some(w) => w.write_access(message),
        None if level <= LogLevel::Warn => eprintln!("{message}"),
        None => println!("{message}"),
    }
}

fn write_info(message: &str) {
    write_at(LogLevel::Info, message);
}

/// Access lines bypass the level filter; `logging.access_log` gates them
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Heroes API started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(max) = config.performance.max_connections {
        write_info(&format!("Max connections: {max}"));
    }
    write_info(&format!("Max body size: {} bytes", config.http.max_body_size));
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

/// `abandoned` counts connections still open when the drain gave up
pub fn log_server_stop(abandoned: usize, heroes: usize) {
    if abandoned == 0 {
        write_info("[Shutdown] Listener closed, all connections drained");
    } else {
        log_warning(&format!(
            "[Shutdown] Listener closed, {abandoned} connection(s) abandoned after drain timeout"
        ));
    }
    write_info(&format!("[Shutdown] {heroes} hero(es) held in memory will be discarded"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_at(
        LogLevel::Debug,
        &format!("[Connection] Accepted from: {peer_addr}"),
    );
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

pub fn log_request(method: &Method, uri: &Uri) {
    write_info(&format!("[Request] {method} {uri}"));
}

/// Human-readable outcome of a hero mutation or lookup
pub fn log_hero(message: &str) {
    write_info(&format!("[Hero] {message}"));
}

pub fn log_error(message: &str) {
    write_at(LogLevel::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_at(LogLevel::Warn, &format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}
