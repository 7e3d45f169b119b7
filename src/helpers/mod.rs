mod get_env_var;

pub use get_env_var::get_optional_env_variable;
