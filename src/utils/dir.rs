use std::{env, io, path::PathBuf};

use anyhow::{Context, Result};

/// Directory holding the config file and logs. Created on first use.
/// On Linux this resolves under $XDG_STATE_HOME or $HOME/.local/state.
pub fn application_dir() -> Result<PathBuf> {
    let base = {
        #[cfg(windows)]
        {
            PathBuf::from(env::var("APPDATA").context("APPDATA should be present on Windows")?)
        }
        #[cfg(not(windows))]
        {
            env::var("XDG_STATE_HOME")
                .map(PathBuf::from)
                .or_else(|_| {
                    env::var("HOME").map(|home| {
                        let mut path = PathBuf::from(home);
                        path.push(".local/state");
                        path
                    })
                })
                .context("Couldn't find neither XDG_STATE_HOME nor HOME")?
        }
    };

    let path = base.join("timesheet");
    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}
