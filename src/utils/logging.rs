//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the ProctorRoom engine.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "proctorroom.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log an allocation outcome with structured data
pub fn log_allocation(exam_id: Uuid, rooms: usize, students: usize, proctored: bool) {
    info!(
        exam_id = %exam_id,
        rooms = rooms,
        students = students,
        proctored = proctored,
        "Exam rooms allocated"
    );
}

/// Log admission decisions
pub fn log_admission(request_id: Uuid, room_id: Uuid, faculty_id: Uuid, approved: bool) {
    if approved {
        info!(
            request_id = %request_id,
            room_id = %room_id,
            faculty_id = %faculty_id,
            "Join request approved"
        );
    } else {
        warn!(
            request_id = %request_id,
            room_id = %room_id,
            faculty_id = %faculty_id,
            "Join request rejected"
        );
    }
}

/// Log a capacity event on a room
pub fn log_capacity_event(room_id: Uuid, event: &str, current: i32, max: i32) {
    info!(
        room_id = %room_id,
        event = event,
        current_students = current,
        max_students = max,
        "Room occupancy changed"
    );
}
