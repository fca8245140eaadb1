mod factory;
mod tool_spec;
mod work_dir;

pub use factory::*;
pub use tool_spec::*;
pub use work_dir::*;
