use std::path::PathBuf;
use std::sync::mpsc::{Receiver, channel};

use verdant_world::WorldGenParams;
use verdant_world::worldgen::load_params_from_path;

/// Watches the world config on a background thread; the main loop polls it.
pub struct ConfigWatcher {
    path: PathBuf,
    rx: Receiver<()>,
}

impl ConfigWatcher {
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = channel::<()>();
        let watched = path.clone();
        std::thread::spawn(move || {
            use notify::{EventKind, RecursiveMode, Watcher};
            match notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                if let Ok(event) = res {
                    match event.kind {
                        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Any => {
                            let _ = tx.send(());
                        }
                        _ => {}
                    }
                }
            }) {
                Ok(mut watcher) => {
                    if let Err(e) = watcher.watch(&watched, RecursiveMode::NonRecursive) {
                        log::warn!("cannot watch {}: {}", watched.display(), e);
                        return;
                    }
                    loop {
                        std::thread::sleep(std::time::Duration::from_secs(3600));
                    }
                }
                Err(e) => log::warn!("config watcher unavailable: {}", e),
            }
        });
        log::info!("watching {} for changes", path.display());
        Self { path, rx }
    }

    /// Freshly parsed params if the file changed since the last poll.
    pub fn poll(&self) -> Option<WorldGenParams> {
        if self.rx.try_iter().count() == 0 {
            return None;
        }
        if !self.path.exists() {
            log::warn!("world config missing: {}", self.path.display());
            return None;
        }
        match load_params_from_path(&self.path) {
            Ok(params) => {
                log::info!("world config reloaded from {}", self.path.display());
                Some(params)
            }
            Err(e) => {
                log::warn!("world config reload failed ({}): {}", self.path.display(), e);
                None
            }
        }
    }
}
