use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use log::debug;

use crate::env::HostEnv;
use crate::error::{Error, Result};
use crate::model::{EnvMap, Entry, Origin, Source};
use crate::parser::parse_reader;

/// Load a single source, snapshotting the process environment for `@`.
pub fn load(source: &Source) -> Result<EnvMap> {
    match source {
        Source::File(path) => load_file(path),
        Source::Stdin => load_stdin(),
        Source::CurrentEnvironment => Ok(HostEnv::process().snapshot()),
    }
}

/// Load an environment file.
///
/// The path is made absolute first so diagnostics name the exact file.
pub fn load_file(path: impl AsRef<Path>) -> Result<EnvMap> {
    let path = path.as_ref();
    let absolute = std::path::absolute(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let file = File::open(&absolute).map_err(|source| Error::Open {
        path: absolute.clone(),
        source,
    })?;
    load_reader(BufReader::new(file), Origin::File(absolute))
}

/// Load `NAME=VALUE` lines from any buffered reader.
pub fn load_reader<R: io::BufRead>(reader: R, origin: Origin) -> Result<EnvMap> {
    let entries = parse_reader(reader, &origin)?;
    debug!("loaded {} variable(s) from {origin}", entries.len());
    Ok(into_map(entries))
}

fn load_stdin() -> Result<EnvMap> {
    load_reader(io::stdin().lock(), Origin::Stdin)
}

fn into_map(entries: Vec<Entry>) -> EnvMap {
    entries
        .into_iter()
        .map(|entry| (OsString::from(entry.key), OsString::from(entry.value)))
        .collect()
}

/// Fold `overlay` on top of `base`: every overlay key wins, other base keys
/// are kept.
pub fn merge(base: &EnvMap, overlay: &EnvMap) -> EnvMap {
    let mut merged = base.clone();
    merged.extend(overlay.iter().map(|(key, value)| (key.clone(), value.clone())));
    merged
}

/// Builder that assembles the combined environment for one invocation.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    sources: Vec<Source>,
    inherit: bool,
    host: HostEnv,
}

impl EnvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    pub fn sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = Source>,
    {
        self.sources.extend(sources);
        self
    }

    /// Append a file source.
    pub fn path(self, path: impl AsRef<Path>) -> Self {
        self.source(Source::File(path.as_ref().to_path_buf()))
    }

    pub fn paths<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.sources(
            paths
                .into_iter()
                .map(|path| Source::File(path.as_ref().to_path_buf())),
        )
    }

    /// Seed the result with the host environment. Defaults to `true`.
    pub fn inherit(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }

    pub fn host(mut self, host: HostEnv) -> Self {
        self.host = host;
        self
    }

    pub fn host_env(&self) -> &HostEnv {
        &self.host
    }

    /// Build the combined environment from a fresh host snapshot.
    pub fn assemble(&self) -> Result<EnvMap> {
        self.assemble_from(&self.host.snapshot())
    }

    /// Build the combined environment against an already captured host
    /// snapshot, which also serves every `@` source.
    pub fn assemble_from(&self, snapshot: &EnvMap) -> Result<EnvMap> {
        let mut combined = if self.inherit {
            snapshot.clone()
        } else {
            EnvMap::new()
        };

        for source in &self.sources {
            let loaded = match source {
                Source::CurrentEnvironment => snapshot.clone(),
                other => load(other)?,
            };
            debug!("applying {} variable(s) from {source}", loaded.len());
            combined = merge(&combined, &loaded);
        }

        Ok(combined)
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            inherit: true,
            host: HostEnv::process(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(key, value)| (OsString::from(key), OsString::from(value)))
            .collect()
    }

    #[test]
    fn merge_prefers_overlay_and_keeps_base() {
        let base = map(&[("A", "1"), ("B", "base")]);
        let overlay = map(&[("B", "overlay"), ("C", "3")]);

        let merged = merge(&base, &overlay);

        assert_eq!(merged, map(&[("A", "1"), ("B", "overlay"), ("C", "3")]));
        assert_eq!(base, map(&[("A", "1"), ("B", "base")]));
    }

    #[test]
    fn no_inherit_and_no_sources_is_empty() {
        let loader = EnvLoader::new()
            .inherit(false)
            .host(HostEnv::from_memory(map(&[("A", "1")])));
        assert!(loader.assemble().expect("assemble should succeed").is_empty());
    }

    #[test]
    fn inherit_seeds_with_host() {
        let host = map(&[("A", "1"), ("PATH", "/bin")]);
        let loader = EnvLoader::new().host(HostEnv::from_memory(host.clone()));
        assert_eq!(loader.assemble().expect("assemble should succeed"), host);
    }

    #[test]
    fn current_environment_source_works_without_inherit() {
        let loader = EnvLoader::new()
            .inherit(false)
            .source(Source::CurrentEnvironment)
            .host(HostEnv::from_memory(map(&[("HOME", "/home/me")])));
        assert_eq!(
            loader.assemble().expect("assemble should succeed"),
            map(&[("HOME", "/home/me")])
        );
    }
}
