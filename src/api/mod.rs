pub mod assignment;
pub mod attendance;
pub mod guard;
pub mod menu;
pub mod role;
pub mod site;
pub mod visitor;
