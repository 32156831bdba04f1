pub mod analysis_view;
pub mod api_key_field;
pub mod error_banner;
pub mod header;
pub mod upload_area;
