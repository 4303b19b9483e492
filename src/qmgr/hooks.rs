// src/qmgr/hooks.rs

//! Hook content staging. Hook bodies never travel inline on the wire: the
//! client and server share `$PBS_HOME/server_priv/hooks/`, and the staged
//! file's basename is the handshake token for one import or export.

use crate::config::PbsConfig;
use crate::qmgr::parser::HOOKSTR_BASE64;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// The per-process staging file under the hooks workdir. Created once at
/// startup; a failure is remembered and reported when a hook directive
/// actually needs the file.
pub struct HookStage {
    workdir: PathBuf,
    tempfile: Option<PathBuf>,
    error: Option<String>,
}

impl HookStage {
    /// Reserves a unique staging filename `qmgr_hook<pid>XXXXXX` under the
    /// hooks workdir. The file itself is created atomically and removed;
    /// only the reserved name is kept, matching the handshake contract.
    pub fn new(cfg: &PbsConfig) -> HookStage {
        let workdir = cfg.hooks_workdir();
        let prefix = format!("qmgr_hook{}", std::process::id());
        match tempfile::Builder::new()
            .prefix(&prefix)
            .rand_bytes(6)
            .tempfile_in(&workdir)
        {
            Ok(file) => {
                let path = file.path().to_path_buf();
                // Keep the name, drop the inode; import/export recreate it.
                drop(file);
                HookStage {
                    workdir,
                    tempfile: Some(path),
                    error: None,
                }
            }
            Err(e) => HookStage {
                workdir,
                tempfile: None,
                error: Some(format!(
                    "unable to generate a hook_tempfile under {} - {e}",
                    cfg.hooks_workdir().display()
                )),
            },
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// The staged file path, or the recorded failure.
    pub fn tempfile(&self) -> Result<&Path, String> {
        match (&self.tempfile, &self.error) {
            (Some(p), _) => Ok(p),
            (None, Some(e)) => Err(e.clone()),
            (None, None) => Err("no hook_tempfile".to_string()),
        }
    }

    /// The staged file with `suffix` appended, used for config-type hook
    /// content whose file suffix the server validates.
    pub fn tempfile_with_suffix(&self, suffix: &str) -> Result<PathBuf, String> {
        let base = self.tempfile()?;
        let mut name = base.as_os_str().to_os_string();
        name.push(suffix);
        Ok(PathBuf::from(name))
    }

    /// True when the workdir itself is unreadable, which the executor
    /// reports as an authorization failure naming user, host, and server.
    pub fn workdir_inaccessible(&self) -> bool {
        fs::metadata(&self.workdir).is_err()
    }

    /// Removes the staged file if present.
    pub fn cleanup(&self) {
        if let Some(p) = &self.tempfile {
            let _ = fs::remove_file(p);
        }
    }
}

impl Drop for HookStage {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Copies hook content between a file (or stdin/stdout when the path is
/// empty) and the staging area.
///
/// With base64 encoding, an empty line terminates the stream: `print hook`
/// output carries one or more base64-encoded hook bodies each ended by a
/// blank line, and feeding that output back through `qmgr` must stop at
/// the right place.
pub fn dump_file(
    infile: Option<&Path>,
    outfile: Option<&Path>,
    encoding: &str,
) -> Result<(), String> {
    let base64_mode = encoding == HOOKSTR_BASE64;

    let mut reader: Box<dyn BufRead> = match infile {
        None => Box::new(BufReader::new(std::io::stdin())),
        Some(p) => {
            let f = fs::File::open(p).map_err(|e| format!("{} - {e}", p.display()))?;
            let md = f
                .metadata()
                .map_err(|e| format!("{} - {e}", p.display()))?;
            if !md.is_file() {
                return Err(format!("{} - Permission denied", p.display()));
            }
            Box::new(BufReader::new(f))
        }
    };

    let mut writer: Box<dyn Write> = match outfile {
        None => Box::new(std::io::stdout()),
        Some(p) => Box::new(
            fs::File::create(p).map_err(|e| format!("{} - {e}", p.display()))?,
        ),
    };

    let result = (|| {
        let mut line = String::new();
        loop {
            line.clear();
            let n = reader
                .read_line(&mut line)
                .map_err(|e| format!("read failed - {e}"))?;
            if n == 0 {
                break;
            }
            if base64_mode && line == "\n" {
                break;
            }
            writer.write_all(line.as_bytes()).map_err(|e| {
                format!(
                    "write to {} failed! Aborting... ({e})",
                    outfile.map(|p| p.display().to_string()).unwrap_or_default()
                )
            })?;
        }
        writer
            .flush()
            .map_err(|e| format!("Failed to dump file ({e})"))
    })();

    if result.is_err() {
        if let Some(p) = outfile {
            let _ = fs::remove_file(p);
        }
    }
    result
}

/// Reads a staged file and emits it base64-encoded with a terminating
/// blank line, the form `print hook` embeds.
pub fn emit_base64(path: &Path, out: &mut impl Write) -> Result<(), String> {
    let mut raw = Vec::new();
    fs::File::open(path)
        .and_then(|mut f| f.read_to_end(&mut raw))
        .map_err(|e| format!("{} - {e}", path.display()))?;
    let encoded = BASE64.encode(&raw);
    for chunk in encoded.as_bytes().chunks(64) {
        out.write_all(chunk)
            .and_then(|_| out.write_all(b"\n"))
            .map_err(|e| format!("write failed - {e}"))?;
    }
    out.write_all(b"\n").map_err(|e| format!("write failed - {e}"))?;
    Ok(())
}

/// Decodes a base64 stream (as emitted by [`emit_base64`]) into raw bytes.
pub fn decode_base64_stream(text: &str) -> Result<Vec<u8>, String> {
    let mut joined = String::new();
    for line in text.lines() {
        if line.is_empty() {
            break;
        }
        joined.push_str(line.trim_end());
    }
    BASE64
        .decode(joined.as_bytes())
        .map_err(|e| format!("invalid base64 hook content - {e}"))
}
