pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod point_service;
pub use point_service::PointService;
