//! Annotation session: the loaded image sequence, one hotspot position per
//! image, and which image is active.
//!
//! The session is independent of the UI. The app owns one, reads it through
//! the accessors and changes it only through the operations below.
//! [`Session::revision`] changes whenever state does, so views can cache
//! anything derived from it.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::export::ExportedPosition;
use crate::position::{parse_numeric, plot_position, Axis, PlotEvent, PlotOptions, Position};

// ── Images ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(Uuid);

impl ImageId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// An uploaded file, kept as-is.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }
}

/// Creates and releases the renderable handle for each uploaded file.
///
/// Every handle returned by `create` is passed back to `release` exactly
/// once, when its image leaves the session.
pub trait DisplayStore {
    type Handle;

    fn create(&mut self, file: &SourceFile) -> Self::Handle;
    fn release(&mut self, handle: Self::Handle);
}

#[derive(Debug)]
pub struct ImageRecord<H> {
    id: ImageId,
    file: SourceFile,
    display: H,
}

impl<H> ImageRecord<H> {
    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.file.name
    }

    pub fn display(&self) -> &H {
        &self.display
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

// ── Session ─────────────────────────────────────────────────────────────────

/// Invariants:
/// - `positions` has exactly one entry per image in `images`.
/// - `active`, when set, names an image in `images`.
#[derive(Debug)]
pub struct Session<H> {
    images: Vec<ImageRecord<H>>,
    positions: HashMap<ImageId, Position>,
    active: Option<ImageId>,
    revision: u64,
}

impl<H> Default for Session<H> {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            positions: HashMap::new(),
            active: None,
            revision: 0,
        }
    }
}

impl<H> Session<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[ImageRecord<H>] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn image(&self, id: ImageId) -> Option<&ImageRecord<H>> {
        self.images.iter().find(|image| image.id == id)
    }

    pub fn position(&self, id: ImageId) -> Option<Position> {
        self.positions.get(&id).copied()
    }

    pub fn active_id(&self) -> Option<ImageId> {
        self.active
    }

    pub fn active_image(&self) -> Option<&ImageRecord<H>> {
        self.active.and_then(|id| self.image(id))
    }

    /// Bumped on every state change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Positions only live in memory, so anything loaded is unsaved.
    pub fn has_unsaved_work(&self) -> bool {
        !self.images.is_empty()
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Append files in order. The first new image becomes active if nothing
    /// was active before.
    pub fn upload<S>(
        &mut self,
        files: impl IntoIterator<Item = SourceFile>,
        store: &mut S,
    ) -> Vec<ImageId>
    where
        S: DisplayStore<Handle = H>,
    {
        let mut added = Vec::new();
        for file in files {
            let id = ImageId::generate();
            let display = store.create(&file);
            debug!("upload: {} as {}", file.name, id);
            self.images.push(ImageRecord { id, file, display });
            self.positions.insert(id, Position::UNSET);
            added.push(id);
        }

        if added.is_empty() {
            return added;
        }
        if self.active.is_none() {
            self.active = added.first().copied();
        }
        self.touch();
        added
    }

    /// Record a click on the displayed image. Returns the stored position,
    /// or `None` if the image is unknown.
    pub fn plot(
        &mut self,
        id: ImageId,
        event: &PlotEvent,
        options: &PlotOptions,
    ) -> Option<Position> {
        let position = plot_position(event, options);
        let slot = self.positions.get_mut(&id)?;
        *slot = position;
        debug!("plot {id}: {position:?}");
        self.touch();
        Some(position)
    }

    /// Overwrite one axis from raw field text. Unparseable text stores NaN.
    pub fn set_coordinate(&mut self, id: ImageId, axis: Axis, raw: &str) {
        self.set_axis(id, axis, parse_numeric(raw));
    }

    pub fn set_axis(&mut self, id: ImageId, axis: Axis, value: f64) {
        let Some(position) = self.positions.get_mut(&id) else {
            return;
        };
        position.set(axis, value);
        debug!("set {id} {} = {value}", axis.name());
        self.touch();
    }

    /// Zero the position. The image stays.
    pub fn reset_position(&mut self, id: ImageId) {
        let Some(position) = self.positions.get_mut(&id) else {
            return;
        };
        *position = Position::ZERO;
        debug!("reset {id}");
        self.touch();
    }

    pub fn reset_all(&mut self) {
        if self.positions.is_empty() {
            return;
        }
        for position in self.positions.values_mut() {
            *position = Position::ZERO;
        }
        debug!("reset all {} positions", self.positions.len());
        self.touch();
    }

    /// Remove an image and its position and release its display handle.
    /// Deleting the active image leaves nothing active.
    pub fn delete_image<S>(&mut self, id: ImageId, store: &mut S) -> bool
    where
        S: DisplayStore<Handle = H>,
    {
        let Some(index) = self.images.iter().position(|image| image.id == id) else {
            return false;
        };
        let record = self.images.remove(index);
        self.positions.remove(&id);
        if self.active == Some(id) {
            self.active = None;
        }
        debug!("delete {} ({})", record.file.name, id);
        store.release(record.display);
        self.touch();
        true
    }

    pub fn delete_all<S>(&mut self, store: &mut S)
    where
        S: DisplayStore<Handle = H>,
    {
        if self.images.is_empty() && self.active.is_none() {
            return;
        }
        debug!("delete all {} images", self.images.len());
        for record in self.images.drain(..) {
            store.release(record.display);
        }
        self.positions.clear();
        self.active = None;
        self.touch();
    }

    /// Release every display handle. The session is empty afterwards.
    pub fn teardown<S>(&mut self, store: &mut S)
    where
        S: DisplayStore<Handle = H>,
    {
        self.delete_all(store);
    }

    /// Ids that are not in the sequence are ignored.
    pub fn select_active(&mut self, id: Option<ImageId>) {
        if let Some(id) = id {
            if self.image(id).is_none() {
                debug!("select: ignoring unknown image {id}");
                return;
            }
        }
        if self.active != id {
            self.active = id;
            self.touch();
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        let active = self.active?;
        self.images.iter().position(|image| image.id == active)
    }

    pub fn is_first_active(&self) -> bool {
        self.active_index() == Some(0)
    }

    pub fn is_last_active(&self) -> bool {
        self.active_index() == Some(self.images.len().saturating_sub(1))
    }

    /// Step the active image, stopping at either end. Returns whether the
    /// active image changed.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        let Some(index) = self.active_index() else {
            return false;
        };
        let target = match direction {
            Direction::Previous => index.checked_sub(1),
            Direction::Next => Some(index + 1).filter(|&i| i < self.images.len()),
        };
        let Some(target) = target else {
            return false;
        };
        self.active = Some(self.images[target].id);
        self.touch();
        true
    }

    /// Positions in image order, ready for export.
    pub fn serialize(&self) -> Vec<ExportedPosition> {
        self.images
            .iter()
            .map(|image| {
                let position = self.positions.get(&image.id).copied().unwrap_or_default();
                ExportedPosition::from(position)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::PointerButton;
    use std::collections::HashSet;

    /// Hands out sequential handles and records what comes back.
    #[derive(Default)]
    struct CountingStore {
        created: usize,
        released: Vec<usize>,
    }

    impl DisplayStore for CountingStore {
        type Handle = usize;

        fn create(&mut self, _file: &SourceFile) -> usize {
            self.created += 1;
            self.created
        }

        fn release(&mut self, handle: usize) {
            self.released.push(handle);
        }
    }

    fn files(names: &[&str]) -> Vec<SourceFile> {
        names
            .iter()
            .map(|name| SourceFile::new(*name, name.as_bytes().to_vec()))
            .collect()
    }

    fn session_with(names: &[&str]) -> (Session<usize>, CountingStore, Vec<ImageId>) {
        let mut store = CountingStore::default();
        let mut session = Session::new();
        let ids = session.upload(files(names), &mut store);
        (session, store, ids)
    }

    fn assert_invariants(session: &Session<usize>) {
        let image_ids: HashSet<_> = session.images().iter().map(|i| i.id()).collect();
        let position_ids: HashSet<_> = session.positions.keys().copied().collect();
        assert_eq!(image_ids, position_ids);
        if let Some(active) = session.active_id() {
            assert!(image_ids.contains(&active));
        }
    }

    fn primary_click(x: f64, y: f64) -> PlotEvent {
        PlotEvent {
            x,
            y,
            width: 200.0,
            height: 100.0,
            button: PointerButton::Primary,
        }
    }

    #[test]
    fn test_upload_appends_and_activates_first() {
        let (mut session, mut store, ids) = session_with(&["a.png", "b.png"]);
        assert_eq!(session.len(), 2);
        assert_eq!(session.active_id(), Some(ids[0]));
        assert_eq!(session.position(ids[1]), Some(Position::UNSET));

        session.select_active(Some(ids[1]));
        let more = session.upload(files(&["c.png"]), &mut store);
        let names: Vec<_> = session.images().iter().map(|i| i.name()).collect();
        assert_eq!(names, ["a.png", "b.png", "c.png"]);
        // An existing selection is kept.
        assert_eq!(session.active_id(), Some(ids[1]));
        assert_ne!(more[0], ids[0]);
        assert_invariants(&session);
    }

    #[test]
    fn test_upload_after_deselect_activates_new_image() {
        let (mut session, mut store, ids) = session_with(&["a.png"]);
        session.delete_image(ids[0], &mut store);
        let added = session.upload(files(&["b.png", "c.png"]), &mut store);
        assert_eq!(session.active_id(), Some(added[0]));
    }

    #[test]
    fn test_unsaved_work_follows_images() {
        let (mut session, mut store, _) = session_with(&[]);
        assert!(!session.has_unsaved_work());
        let ids = session.upload(files(&["a.png"]), &mut store);
        assert!(session.has_unsaved_work());
        session.delete_image(ids[0], &mut store);
        assert!(!session.has_unsaved_work());
    }

    #[test]
    fn test_empty_upload_is_noop() {
        let (mut session, mut store, _) = session_with(&[]);
        let revision = session.revision();
        assert!(session.upload(Vec::new(), &mut store).is_empty());
        assert_eq!(session.active_id(), None);
        assert_eq!(session.revision(), revision);
    }

    #[test]
    fn test_key_parity_across_uploads_and_deletes() {
        let (mut session, mut store, ids) = session_with(&["a", "b", "c", "d"]);
        assert_invariants(&session);
        session.delete_image(ids[2], &mut store);
        assert_invariants(&session);
        session.upload(files(&["e", "f"]), &mut store);
        assert_invariants(&session);
        session.delete_image(ids[0], &mut store);
        session.delete_image(ids[0], &mut store);
        assert_invariants(&session);
        session.delete_all(&mut store);
        assert_invariants(&session);
        assert!(session.positions.is_empty());
    }

    #[test]
    fn test_plot_scenario() {
        let (mut session, _, ids) = session_with(&["a.png"]);
        let stored = session.plot(ids[0], &primary_click(106.0, 56.0), &PlotOptions::default());
        assert_eq!(stored, Some(Position::new(50.0, 50.0)));
        assert_eq!(session.serialize(), vec![ExportedPosition { left: 50.0, top: 50.0 }]);
    }

    #[test]
    fn test_plot_unknown_image() {
        let (mut session, mut store, ids) = session_with(&["a.png"]);
        session.delete_image(ids[0], &mut store);
        assert_eq!(session.plot(ids[0], &primary_click(10.0, 10.0), &PlotOptions::default()), None);
        assert_invariants(&session);
    }

    #[test]
    fn test_secondary_click_clears() {
        let (mut session, _, ids) = session_with(&["a.png"]);
        let options = PlotOptions::default();
        session.plot(ids[0], &primary_click(106.0, 56.0), &options);
        let right = PlotEvent {
            button: PointerButton::Secondary,
            ..primary_click(150.0, 80.0)
        };
        session.plot(ids[0], &right, &options);
        assert_eq!(session.position(ids[0]), Some(Position::ZERO));
        assert!(!session.position(ids[0]).unwrap().is_marked());
    }

    #[test]
    fn test_set_coordinate_preserves_other_axis() {
        let (mut session, _, ids) = session_with(&["a.png"]);
        session.set_axis(ids[0], Axis::Left, 10.0);
        session.set_axis(ids[0], Axis::Top, 20.0);
        session.set_coordinate(ids[0], Axis::Top, "55");
        assert_eq!(session.position(ids[0]), Some(Position::new(10.0, 55.0)));
    }

    #[test]
    fn test_set_coordinate_on_unset_position() {
        let (mut session, _, ids) = session_with(&["a.png"]);
        session.set_coordinate(ids[0], Axis::Left, "12.5");
        assert_eq!(
            session.position(ids[0]),
            Some(Position {
                left: Some(12.5),
                top: None
            })
        );
        assert_eq!(session.serialize()[0], ExportedPosition { left: 12.5, top: 0.0 });
    }

    #[test]
    fn test_set_coordinate_stores_nan() {
        let (mut session, _, ids) = session_with(&["a.png"]);
        session.set_coordinate(ids[0], Axis::Left, "abc");
        let stored = session.position(ids[0]).unwrap();
        assert!(stored.left.unwrap().is_nan());
        assert_eq!(stored.top, None);
        assert_eq!(session.serialize()[0], ExportedPosition { left: 0.0, top: 0.0 });
    }

    #[test]
    fn test_reset_then_serialize_is_zero() {
        let (mut session, _, ids) = session_with(&["a.png", "b.png"]);
        session.plot(ids[1], &primary_click(80.0, 30.0), &PlotOptions::default());
        session.reset_position(ids[1]);
        assert_eq!(session.serialize()[1], ExportedPosition { left: 0.0, top: 0.0 });
        assert_eq!(session.position(ids[1]), Some(Position::ZERO));
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_clear_all_keeps_images() {
        let (mut session, _, ids) = session_with(&["a.png", "b.png"]);
        session.set_axis(ids[0], Axis::Left, 10.0);
        session.set_axis(ids[0], Axis::Top, 20.0);
        session.set_axis(ids[1], Axis::Left, 30.0);
        session.set_axis(ids[1], Axis::Top, 40.0);
        session.reset_all();
        assert_eq!(session.position(ids[0]), Some(Position::ZERO));
        assert_eq!(session.position(ids[1]), Some(Position::ZERO));
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_delete_active_does_not_advance() {
        let (mut session, mut store, ids) = session_with(&["a.png", "b.png"]);
        assert_eq!(session.active_id(), Some(ids[0]));
        assert!(session.delete_image(ids[0], &mut store));
        let remaining: Vec<_> = session.images().iter().map(|i| i.id()).collect();
        assert_eq!(remaining, [ids[1]]);
        assert_eq!(session.positions.keys().copied().collect::<Vec<_>>(), [ids[1]]);
        assert_eq!(session.active_id(), None);
        assert!(session.active_image().is_none());
    }

    #[test]
    fn test_delete_inactive_keeps_selection() {
        let (mut session, mut store, ids) = session_with(&["a", "b", "c"]);
        session.delete_image(ids[1], &mut store);
        assert_eq!(session.active_id(), Some(ids[0]));
        let names: Vec<_> = session.images().iter().map(|i| i.name()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn test_delete_all() {
        let (mut session, mut store, _) = session_with(&["a", "b", "c"]);
        session.delete_all(&mut store);
        assert!(session.is_empty());
        assert_eq!(session.active_id(), None);
        assert!(!session.has_unsaved_work());
        assert!(session.serialize().is_empty());
    }

    #[test]
    fn test_every_handle_released_once() {
        let (mut session, mut store, ids) = session_with(&["a", "b", "c"]);
        session.delete_image(ids[1], &mut store);
        session.delete_image(ids[1], &mut store);
        session.upload(files(&["d"]), &mut store);
        session.teardown(&mut store);

        let mut released = store.released.clone();
        released.sort_unstable();
        assert_eq!(released, (1..=store.created).collect::<Vec<_>>());
        assert!(session.is_empty());
    }

    #[test]
    fn test_navigation_clamps_at_ends() {
        let (mut session, _, ids) = session_with(&["a", "b", "c"]);
        assert!(session.is_first_active());
        assert!(!session.navigate(Direction::Previous));
        assert_eq!(session.active_id(), Some(ids[0]));

        assert!(session.navigate(Direction::Next));
        assert!(session.navigate(Direction::Next));
        assert_eq!(session.active_id(), Some(ids[2]));
        assert!(session.is_last_active());
        assert!(!session.navigate(Direction::Next));
        assert_eq!(session.active_id(), Some(ids[2]));

        assert!(session.navigate(Direction::Previous));
        assert_eq!(session.active_id(), Some(ids[1]));
    }

    #[test]
    fn test_navigation_without_active_is_noop() {
        let (mut session, _, _) = session_with(&["a", "b"]);
        session.select_active(None);
        assert!(!session.navigate(Direction::Next));
        assert!(!session.navigate(Direction::Previous));
        assert_eq!(session.active_id(), None);
        assert!(!session.is_first_active());
        assert!(!session.is_last_active());
    }

    #[test]
    fn test_select_unknown_id_is_ignored() {
        let (mut session, mut store, ids) = session_with(&["a", "b"]);
        session.delete_image(ids[1], &mut store);
        session.select_active(Some(ids[1]));
        assert_eq!(session.active_id(), Some(ids[0]));
        assert_invariants(&session);
    }

    #[test]
    fn test_serialize_is_idempotent_and_ordered() {
        let (mut session, _, ids) = session_with(&["a", "b", "c"]);
        session.set_coordinate(ids[2], Axis::Left, "30");
        session.set_coordinate(ids[0], Axis::Top, "10");
        let first = session.serialize();
        let second = session.serialize();
        assert_eq!(first, second);
        assert_eq!(first[0], ExportedPosition { left: 0.0, top: 10.0 });
        assert_eq!(first[2], ExportedPosition { left: 30.0, top: 0.0 });
    }

    #[test]
    fn test_revision_tracks_changes() {
        let (mut session, _, ids) = session_with(&["a", "b"]);
        let before = session.revision();
        let _ = session.serialize();
        assert_eq!(session.revision(), before);
        session.select_active(Some(ids[0]));
        assert_eq!(session.revision(), before);
        session.reset_position(ids[1]);
        assert!(session.revision() > before);
    }
}
