use std::path::Path;
use std::sync::mpsc;

use log::*;
use notify::{Event, RecursiveMode, Watcher};

pub struct ShaderChanges {
    #[expect(unused)]
    watcher: notify::RecommendedWatcher,
    receiver: mpsc::Receiver<notify::Result<Event>>,
}

impl ShaderChanges {
    /// gathers all shader edit events since this function was last called
    pub fn events(&mut self) -> anyhow::Result<Vec<notify::Event>> {
        let events: notify::Result<Vec<notify::Event>> = self.receiver.try_iter().collect();
        let mut events = events?;
        events.retain(is_edit);

        Ok(events)
    }

    /// blocks until the next shader edit, then gathers it with any others already queued
    pub fn wait(&mut self) -> anyhow::Result<Vec<notify::Event>> {
        loop {
            let first = self.receiver.recv()?;
            let mut events = vec![first?];
            events.extend(self.events()?);
            events.retain(is_edit);

            if !events.is_empty() {
                return Ok(events);
            }
        }
    }
}

fn is_edit(event: &notify::Event) -> bool {
    match event.kind {
        notify::EventKind::Create(_) => true,
        notify::EventKind::Modify(_) => true,
        notify::EventKind::Remove(_) => true,

        notify::EventKind::Access(_) => false,
        notify::EventKind::Any => {
            error!("unexpected notify event: {event:?}");
            false
        }
        notify::EventKind::Other => {
            error!("unexpected notify event: {event:?}");
            false
        }
    }
}

/// watches a compiled shader file
///
/// The parent directory is watched, since compilers often replace the file instead of writing it.
pub fn watch(shader_path: &Path) -> notify::Result<ShaderChanges> {
    let (sender, receiver) = mpsc::channel::<notify::Result<Event>>();

    let mut watcher = notify::recommended_watcher(sender)?;

    let watched_path = match shader_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    watcher.watch(watched_path, RecursiveMode::NonRecursive)?;

    Ok(ShaderChanges { watcher, receiver })
}

/// whether any of `events` touched `shader_path`
pub fn touches(events: &[notify::Event], shader_path: &Path) -> bool {
    let file_name = shader_path.file_name();

    events
        .iter()
        .flat_map(|event| &event.paths)
        .any(|path| path.file_name() == file_name)
}
