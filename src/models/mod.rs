pub mod build_result;
pub mod container_group;
