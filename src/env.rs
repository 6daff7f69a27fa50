use crate::model::EnvMap;

/// Where the host environment snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostEnv {
    kind: HostEnvKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum HostEnvKind {
    /// Read the invoking process's environment at snapshot time.
    #[default]
    Process,
    /// A fixed map, used in place of the process environment.
    Memory(EnvMap),
}

impl HostEnv {
    /// Snapshot the real process environment.
    pub fn process() -> Self {
        Self {
            kind: HostEnvKind::Process,
        }
    }

    /// Pretend the host environment is exactly `map`.
    pub fn from_memory(map: EnvMap) -> Self {
        Self {
            kind: HostEnvKind::Memory(map),
        }
    }

    /// Capture the environment as it is right now.
    pub fn snapshot(&self) -> EnvMap {
        match &self.kind {
            HostEnvKind::Process => snapshot_process_env(),
            HostEnvKind::Memory(map) => map.clone(),
        }
    }
}

fn snapshot_process_env() -> EnvMap {
    std::env::vars_os().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{OsStr, OsString};

    #[test]
    fn memory_snapshot_is_independent_copy() {
        let mut map = EnvMap::new();
        map.insert(OsString::from("A"), OsString::from("1"));
        let host = HostEnv::from_memory(map);

        let mut first = host.snapshot();
        first.insert(OsString::from("B"), OsString::from("2"));

        let second = host.snapshot();
        assert_eq!(second.len(), 1);
        assert_eq!(second.get(OsStr::new("A")), Some(&OsString::from("1")));
    }

    #[test]
    fn process_snapshot_sees_path() {
        let snapshot = HostEnv::process().snapshot();
        if let Some(path) = std::env::var_os("PATH") {
            assert_eq!(snapshot.get(OsStr::new("PATH")), Some(&path));
        }
    }
}
