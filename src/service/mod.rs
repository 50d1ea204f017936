pub mod render_service;
