pub mod appointments;
pub mod auth;
pub mod classes;
pub mod courses;
pub mod material_types;
pub mod materials;
pub mod messages;
pub mod premium_content;
pub mod settings;
pub mod stats;
pub mod uploads;
pub mod users;
