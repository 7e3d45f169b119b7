use std::env;

/// Read an environment variable, an unset or empty variable yields `None`.
pub fn get_optional_env_variable(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
