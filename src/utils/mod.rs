pub mod app_time;
pub mod db_utils;
pub mod geo;
pub mod site_cache;
