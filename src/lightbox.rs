//! Gallery session state for the image lightbox.
//!
//! [`Lightbox`] is either closed or holds one [`Session`] (the ordered image
//! list, caption and current index). Zoom and pan live beside the session and
//! are reset whenever the displayed image changes. Every operation is a plain
//! state transition; the frontend reads the result back and mirrors it into
//! the DOM.

pub const LIGHTBOX_ID: &str = "lightbox";
pub const IMAGE_ID: &str = "lightbox-img";
pub const CAPTION_ID: &str = "lightbox-caption";
pub const THUMBNAILS_SELECTOR: &str = ".thumbnail-container";
pub const PREV_SELECTOR: &str = ".lightbox-prev";
pub const NEXT_SELECTOR: &str = ".lightbox-next";
pub const CLOSE_SELECTOR: &str = ".lightbox-close";
pub const ZOOM_IN_SELECTOR: &str = ".zoom-in";
pub const ZOOM_OUT_SELECTOR: &str = ".zoom-out";
pub const ZOOM_RESET_SELECTOR: &str = ".zoom-reset";
pub const OPEN_CLASS: &str = "open";
pub const ACTIVE_THUMBNAIL_CLASS: &str = "active";
pub const CLOSE_ACTION: &str = "close";
pub const GALLERY_ATTRIBUTE: &str = "data-gallery";
pub const THUMBNAIL_INDEX_ATTRIBUTE: &str = "data-index";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLimits {
    pub step: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Close,
    Next,
    Prev,
    ZoomIn,
    ZoomOut,
    ResetZoom,
}

impl Command {
    /// Keyboard shortcut mapping, consulted only while the lightbox is open.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Escape" => Some(Self::Close),
            "ArrowRight" => Some(Self::Next),
            "ArrowLeft" => Some(Self::Prev),
            "+" => Some(Self::ZoomIn),
            "-" => Some(Self::ZoomOut),
            "0" => Some(Self::ResetZoom),
            _ => None,
        }
    }

    pub fn from_wheel(delta_y: f64) -> Self {
        if delta_y < 0.0 {
            Self::ZoomIn
        } else {
            Self::ZoomOut
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Grab,
    Grabbing,
}

impl Cursor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    images: Vec<String>,
    caption: String,
    index: usize,
}

impl Session {
    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &str {
        &self.images[self.index]
    }
}

#[derive(Debug)]
pub struct Lightbox {
    limits: ZoomLimits,
    session: Option<Session>,
    zoom: f64,
    pan: (f64, f64),
    drag_anchor: Option<(f64, f64)>,
    epoch: u64,
}

impl Lightbox {
    pub fn new(limits: ZoomLimits) -> Self {
        Self {
            limits,
            session: None,
            zoom: 1.0,
            pan: (0.0, 0.0),
            drag_anchor: None,
            epoch: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> (f64, f64) {
        self.pan
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Starts a session. Returns `false` (and stays closed) for an empty list.
    pub fn open(&mut self, images: Vec<String>, caption: &str, start_index: usize) -> bool {
        if images.is_empty() {
            return false;
        }

        let index = if start_index < images.len() { start_index } else { 0 };
        self.epoch += 1;
        self.session = Some(Session {
            images,
            caption: caption.to_string(),
            index,
        });
        self.reset_zoom();
        true
    }

    /// Jumps to `index`. Out-of-range indices and a closed lightbox are no-ops.
    pub fn show(&mut self, index: usize) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if index >= session.images.len() {
            return false;
        }

        session.index = index;
        self.reset_zoom();
        true
    }

    pub fn next(&mut self) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let next = (session.index + 1) % session.images.len();
        self.show(next)
    }

    pub fn prev(&mut self) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let len = session.images.len();
        let prev = (session.index + len - 1) % len;
        self.show(prev)
    }

    /// Ends the session and returns the epoch to pass to
    /// [`Lightbox::should_clear_image`] once the close transition is over.
    pub fn close(&mut self) -> u64 {
        self.session = None;
        self.drag_anchor = None;
        self.reset_zoom();
        self.epoch
    }

    /// True if nothing reopened the lightbox since the close that produced `epoch`.
    pub fn should_clear_image(&self, epoch: u64) -> bool {
        !self.is_open() && self.epoch == epoch
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * self.limits.step).min(self.limits.max);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / self.limits.step).max(self.limits.min);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
        self.pan = (0.0, 0.0);
    }

    /// Returns `false` if the command had nothing to act on.
    pub fn apply(&mut self, command: Command) -> bool {
        if !self.is_open() {
            return false;
        }

        match command {
            Command::Close => {
                self.close();
                true
            }
            Command::Next => self.next(),
            Command::Prev => self.prev(),
            Command::ZoomIn => {
                self.zoom_in();
                true
            }
            Command::ZoomOut => {
                self.zoom_out();
                true
            }
            Command::ResetZoom => {
                self.reset_zoom();
                true
            }
        }
    }

    /// Panning only makes sense on a magnified image.
    pub fn begin_drag(&mut self, x: f64, y: f64) -> Option<Cursor> {
        if !self.is_open() || self.zoom <= 1.0 {
            return None;
        }

        self.drag_anchor = Some((x - self.pan.0, y - self.pan.1));
        Some(Cursor::Grabbing)
    }

    pub fn drag_to(&mut self, x: f64, y: f64) -> bool {
        let Some((anchor_x, anchor_y)) = self.drag_anchor else {
            return false;
        };
        if self.zoom <= 1.0 {
            return false;
        }

        self.pan = (x - anchor_x, y - anchor_y);
        true
    }

    pub fn end_drag(&mut self) -> Cursor {
        self.drag_anchor = None;
        if self.zoom > 1.0 {
            Cursor::Grab
        } else {
            Cursor::Default
        }
    }

    pub fn transform(&self) -> String {
        format!(
            "scale({}) translate({}px, {}px)",
            self.zoom, self.pan.0, self.pan.1
        )
    }
}

/// Builds the gallery for a clicked image from the images sharing its
/// `data-gallery` group, in document order. Each member is `(src, is_clicked)`.
/// Falls back to a single-image gallery when the clicked image is not a member.
pub fn group_gallery<I>(clicked_src: &str, members: I) -> (Vec<String>, usize)
where
    I: IntoIterator<Item = (String, bool)>,
{
    let mut images = Vec::new();
    let mut start = None;

    for (src, is_clicked) in members {
        if is_clicked && start.is_none() {
            start = Some(images.len());
        }
        images.push(src);
    }

    match start {
        Some(start) => (images, start),
        None => (vec![clicked_src.to_string()], 0),
    }
}

pub fn thumbnail_alt(index: usize) -> String {
    format!("Thumbnail {}", index + 1)
}
