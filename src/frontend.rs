use js_sys::{Array, Date, Promise};
use serde_json::json;
use std::{cell::RefCell, rc::Rc, time::Duration};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    window, Document, Element, Event, EventTarget, HtmlButtonElement, HtmlElement,
    HtmlImageElement, HtmlInputElement, HtmlTextAreaElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, MouseEvent, Node, NodeList,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, WheelEvent,
};

use crate::anchor::{fragment_selector, ANCHOR_SELECTOR};
use crate::config::{SiteConfig, CONFIG_ELEMENT_ID};
use crate::contact::{
    submit_enabled, EMAIL_SELECTOR, FORM_ID, MESSAGE_SELECTOR, NAME_SELECTOR, SUBMIT_SELECTOR,
};
use crate::lightbox::{
    group_gallery, thumbnail_alt, Command, Cursor, Lightbox, ACTIVE_THUMBNAIL_CLASS,
    CAPTION_ID, CLOSE_ACTION, CLOSE_SELECTOR, GALLERY_ATTRIBUTE, IMAGE_ID, LIGHTBOX_ID,
    NEXT_SELECTOR, OPEN_CLASS, PREV_SELECTOR, THUMBNAILS_SELECTOR, THUMBNAIL_INDEX_ATTRIBUTE,
    ZOOM_IN_SELECTOR, ZOOM_OUT_SELECTOR, ZOOM_RESET_SELECTOR,
};
use crate::log::{log_event, LogLevel};
use crate::nav::{toggled_display, NAV_PANEL_SELECTOR, NAV_TOGGLE_SELECTOR};
use crate::reveal::{self, RevealTarget, Watcher, PENDING_CLASS, REVEAL_SELECTOR, VISIBLE_CLASS};
use crate::typewriter::{Typewriter, TYPED_ROLE_ID};
use crate::year::{calendar_year, stamp_text, YEAR_ID};

enum Installed {
    Wired,
    Skipped(&'static str),
}

type Installer = fn(&Document, &SiteConfig) -> Result<Installed, JsValue>;

pub fn run() {
    console_error_panic_hook::set_once();

    let Some(document) = window().and_then(|w| w.document()) else {
        return;
    };
    let config = load_config(&document);
    log_event(config.log_level, LogLevel::Info, "boot", json!({}));

    let behaviors: [(&str, Installer); 7] = [
        ("year", install_year),
        ("typewriter", install_typewriter),
        ("reveal", install_reveal),
        ("anchor_scroll", install_anchor_scroll),
        ("nav_toggle", install_nav_toggle),
        ("lightbox", install_lightbox),
        ("contact_gating", install_contact_gating),
    ];

    // Each behavior stands alone; a failure is logged and the rest still load.
    for (behavior, install) in behaviors {
        match install(&document, &config) {
            Ok(Installed::Wired) => log_event(
                config.log_level,
                LogLevel::Info,
                "behavior_installed",
                json!({ "behavior": behavior }),
            ),
            Ok(Installed::Skipped(reason)) => log_event(
                config.log_level,
                LogLevel::Info,
                "behavior_skipped",
                json!({ "behavior": behavior, "reason": reason }),
            ),
            Err(error) => log_event(
                config.log_level,
                LogLevel::Warn,
                "behavior_failed",
                json!({ "behavior": behavior, "error": format!("{error:?}") }),
            ),
        }
    }
}

fn load_config(document: &Document) -> SiteConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        return SiteConfig::default();
    };

    match SiteConfig::from_json(&text) {
        Ok(config) => {
            log_event(
                config.log_level,
                LogLevel::Debug,
                "config_loaded",
                json!({ "roles": config.roles.len() }),
            );
            config
        }
        Err(error) => {
            let config = SiteConfig::default();
            log_event(
                config.log_level,
                LogLevel::Warn,
                "config_invalid",
                json!({ "error": error.to_string() }),
            );
            config
        }
    }
}

/// Attaches `handler` for the lifetime of the page.
fn listen(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

async fn sleep(delay: Duration) {
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Some(win) = window() {
            let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
        }
    });
    let _ = JsFuture::from(promise).await;
}

fn elements(nodes: NodeList) -> Vec<Element> {
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn install_year(document: &Document, _config: &SiteConfig) -> Result<Installed, JsValue> {
    let Some(target) = document.get_element_by_id(YEAR_ID) else {
        return Ok(Installed::Skipped("missing #year"));
    };

    let now = Date::new_0();
    // getTimezoneOffset is minutes behind UTC.
    let utc_offset_minutes = -(now.get_timezone_offset() as i32);
    let year = calendar_year(now.get_time() as i64, utc_offset_minutes);
    target.set_text_content(Some(&stamp_text(year)));
    Ok(Installed::Wired)
}

fn install_typewriter(document: &Document, config: &SiteConfig) -> Result<Installed, JsValue> {
    let Some(target) = document.get_element_by_id(TYPED_ROLE_ID) else {
        return Ok(Installed::Skipped("missing #typed-role"));
    };
    let Some(mut typewriter) = Typewriter::new(&config.roles, config.timing) else {
        return Ok(Installed::Skipped("no roles to type"));
    };

    spawn_local(async move {
        loop {
            let delay = {
                let tick = typewriter.tick();
                target.set_text_content(Some(tick.text));
                tick.delay
            };
            sleep(delay).await;
        }
    });

    Ok(Installed::Wired)
}

impl RevealTarget for Element {
    fn mark_pending(&self) {
        let _ = self.class_list().add_1(PENDING_CLASS);
    }

    fn mark_visible(&self) {
        let _ = self.class_list().add_1(VISIBLE_CLASS);
    }

    fn is_visible(&self) -> bool {
        self.class_list().contains(VISIBLE_CLASS)
    }
}

impl Watcher<Element> for IntersectionObserver {
    fn watch(&self, target: &Element) {
        self.observe(target);
    }

    fn unwatch(&self, target: &Element) {
        self.unobserve(target);
    }
}

fn install_reveal(document: &Document, config: &SiteConfig) -> Result<Installed, JsValue> {
    let targets = elements(document.query_selector_all(REVEAL_SELECTOR)?);
    if targets.is_empty() {
        return Ok(Installed::Skipped("no reveal targets"));
    }

    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                reveal::handle_report(&observer, &entry.target(), entry.is_intersecting());
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(config.reveal_threshold));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();

    reveal::register(&observer, &targets);
    Ok(Installed::Wired)
}

fn install_anchor_scroll(document: &Document, config: &SiteConfig) -> Result<Installed, JsValue> {
    let anchors = elements(document.query_selector_all(ANCHOR_SELECTOR)?);
    if anchors.is_empty() {
        return Ok(Installed::Skipped("no in-page links"));
    }

    let log_level = config.log_level;
    for anchor in anchors {
        let document = document.clone();
        let link = anchor.clone();

        listen(&anchor, "click", move |event: Event| {
            let Some(href) = link.get_attribute("href") else {
                return;
            };
            let Some(selector) = fragment_selector(&href) else {
                return;
            };

            // An unknown or unparsable fragment keeps the browser's own jump.
            let Ok(Some(target)) = document.query_selector(selector) else {
                log_event(
                    log_level,
                    LogLevel::Debug,
                    "anchor_target_missing",
                    json!({ "href": href }),
                );
                return;
            };

            event.prevent_default();
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            target.scroll_into_view_with_scroll_into_view_options(&options);
        })?;
    }

    Ok(Installed::Wired)
}

fn install_nav_toggle(document: &Document, _config: &SiteConfig) -> Result<Installed, JsValue> {
    let Some(toggle) = document.query_selector(NAV_TOGGLE_SELECTOR)? else {
        return Ok(Installed::Skipped("missing .nav-toggle"));
    };
    let Some(panel) = document
        .query_selector(NAV_PANEL_SELECTOR)?
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        return Ok(Installed::Skipped("missing .nav"));
    };

    listen(&toggle, "click", move |_event: Event| {
        let style = panel.style();
        let current = style.get_property_value("display").unwrap_or_default();
        let _ = style.set_property("display", toggled_display(&current));
    })?;

    Ok(Installed::Wired)
}

struct LightboxView {
    document: Document,
    root: Element,
    image: HtmlImageElement,
    caption: Element,
    thumbnails: Element,
    close_button: Option<HtmlElement>,
    state: RefCell<Lightbox>,
    close_clear_delay: Duration,
    log_level: LogLevel,
}

impl LightboxView {
    fn open(&self, images: Vec<String>, caption: &str, start_index: usize) {
        let opened = self.state.borrow_mut().open(images, caption, start_index);
        if !opened {
            return;
        }

        self.caption.set_text_content(Some(caption));
        self.render_thumbnails();
        let _ = self.root.class_list().add_1(OPEN_CLASS);
        let _ = self.root.set_attribute("aria-hidden", "false");
        self.render_image();
        if let Some(close_button) = &self.close_button {
            let _ = close_button.focus();
        }

        let count = self.state.borrow().session().map_or(0, |session| session.images().len());
        log_event(self.log_level, LogLevel::Debug, "lightbox_opened", json!({ "images": count }));
    }

    fn close(self: &Rc<Self>) {
        if !self.state.borrow().is_open() {
            return;
        }

        let epoch = self.state.borrow_mut().close();
        let _ = self.root.class_list().remove_1(OPEN_CLASS);
        let _ = self.root.set_attribute("aria-hidden", "true");
        self.thumbnails.set_inner_html("");
        self.render_transform();
        log_event(self.log_level, LogLevel::Debug, "lightbox_closed", json!({}));

        // Drop the decoded image once the close transition has played out.
        let view = Rc::clone(self);
        spawn_local(async move {
            sleep(view.close_clear_delay).await;
            if view.state.borrow().should_clear_image(epoch) {
                let _ = view.image.remove_attribute("src");
            }
        });
    }

    fn apply(self: &Rc<Self>, command: Command) {
        if command == Command::Close {
            self.close();
            return;
        }

        let changed = self.state.borrow_mut().apply(command);
        if !changed {
            return;
        }
        match command {
            Command::Next | Command::Prev => self.render_image(),
            _ => self.render_transform(),
        }
    }

    fn show(&self, index: usize) {
        let shown = self.state.borrow_mut().show(index);
        if shown {
            self.render_image();
        }
    }

    fn render_thumbnails(&self) {
        self.thumbnails.set_inner_html("");

        let state = self.state.borrow();
        let Some(session) = state.session() else {
            return;
        };

        for (index, src) in session.images().iter().enumerate() {
            let Some(thumbnail) = self
                .document
                .create_element("img")
                .ok()
                .and_then(|element| element.dyn_into::<HtmlImageElement>().ok())
            else {
                continue;
            };
            thumbnail.set_src(src);
            thumbnail.set_alt(&thumbnail_alt(index));
            let _ = thumbnail.set_attribute(THUMBNAIL_INDEX_ATTRIBUTE, &index.to_string());
            let _ = self.thumbnails.append_child(&thumbnail);
        }
    }

    fn render_image(&self) {
        {
            let state = self.state.borrow();
            let Some(session) = state.session() else {
                return;
            };
            self.image.set_src(session.current());

            if let Ok(nodes) = self.thumbnails.query_selector_all("img") {
                for (index, thumbnail) in elements(nodes).into_iter().enumerate() {
                    let _ = thumbnail
                        .class_list()
                        .toggle_with_force(ACTIVE_THUMBNAIL_CLASS, index == session.index());
                }
            }
        }

        self.render_transform();
    }

    fn render_transform(&self) {
        let transform = self.state.borrow().transform();
        let _ = self.image.style().set_property("transform", &transform);
    }

    fn set_cursor(&self, cursor: Cursor) {
        let _ = self.image.style().set_property("cursor", cursor.as_str());
    }

    /// Opens the lightbox for a click on any page image outside the lightbox.
    fn handle_page_click(&self, event: &Event) {
        let Some(clicked) = event
            .target()
            .and_then(|target| target.dyn_into::<HtmlImageElement>().ok())
        else {
            return;
        };
        let node: &Node = clicked.as_ref();
        let in_thumbnails = clicked.closest(THUMBNAILS_SELECTOR).ok().flatten().is_some();
        if in_thumbnails || self.root.contains(Some(node)) {
            return;
        }

        let (images, start_index) = self.gallery_for(&clicked);
        self.open(images, &clicked.alt(), start_index);
    }

    fn gallery_for(&self, clicked: &HtmlImageElement) -> (Vec<String>, usize) {
        let group = clicked
            .get_attribute(GALLERY_ATTRIBUTE)
            .filter(|group| !group.trim().is_empty());
        let Some(group) = group else {
            return (vec![clicked.src()], 0);
        };

        let clicked_node: &Node = clicked.as_ref();
        let members = self
            .document
            .query_selector_all(&format!("img[{GALLERY_ATTRIBUTE}]"))
            .map(elements)
            .unwrap_or_default()
            .into_iter()
            .filter(|member| member.get_attribute(GALLERY_ATTRIBUTE).as_deref() == Some(group.as_str()))
            .filter_map(|member| member.dyn_into::<HtmlImageElement>().ok())
            .map(|member| (member.src(), member.is_same_node(Some(clicked_node))));

        group_gallery(&clicked.src(), members)
    }
}

fn pointer_position(event: &Event) -> Option<(f64, f64)> {
    let pointer = event.dyn_ref::<MouseEvent>()?;
    Some((f64::from(pointer.client_x()), f64::from(pointer.client_y())))
}

fn install_lightbox(document: &Document, config: &SiteConfig) -> Result<Installed, JsValue> {
    let Some(root) = document.get_element_by_id(LIGHTBOX_ID) else {
        return Ok(Installed::Skipped("missing #lightbox"));
    };
    let image = document
        .get_element_by_id(IMAGE_ID)
        .and_then(|element| element.dyn_into::<HtmlImageElement>().ok());
    let caption = document.get_element_by_id(CAPTION_ID);
    let thumbnails = document.query_selector(THUMBNAILS_SELECTOR)?;
    let (Some(image), Some(caption), Some(thumbnails)) = (image, caption, thumbnails) else {
        return Ok(Installed::Skipped("incomplete lightbox markup"));
    };
    let close_button = root
        .query_selector(CLOSE_SELECTOR)?
        .and_then(|element| element.dyn_into::<HtmlElement>().ok());

    let view = Rc::new(LightboxView {
        document: document.clone(),
        root,
        image,
        caption,
        thumbnails,
        close_button,
        state: RefCell::new(Lightbox::new(config.zoom)),
        close_clear_delay: config.close_clear_delay,
        log_level: config.log_level,
    });

    {
        let view = Rc::clone(&view);
        listen(document, "click", move |event: Event| view.handle_page_click(&event))?;
    }

    {
        let handle = Rc::clone(&view);
        listen(&view.thumbnails, "click", move |event: Event| {
            let index = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|target| target.get_attribute(THUMBNAIL_INDEX_ATTRIBUTE))
                .and_then(|value| value.parse::<usize>().ok());
            if let Some(index) = index {
                handle.show(index);
            }
        })?;
    }

    let controls = [
        (NEXT_SELECTOR, Command::Next),
        (PREV_SELECTOR, Command::Prev),
        (ZOOM_IN_SELECTOR, Command::ZoomIn),
        (ZOOM_OUT_SELECTOR, Command::ZoomOut),
        (ZOOM_RESET_SELECTOR, Command::ResetZoom),
    ];
    for (selector, command) in controls {
        if let Some(control) = document.query_selector(selector)? {
            let handle = Rc::clone(&view);
            listen(&control, "click", move |_event: Event| handle.apply(command))?;
        }
    }

    {
        let handle = Rc::clone(&view);
        listen(&view.image, "pointerdown", move |event: Event| {
            let Some((x, y)) = pointer_position(&event) else {
                return;
            };
            let cursor = handle.state.borrow_mut().begin_drag(x, y);
            if let Some(cursor) = cursor {
                handle.set_cursor(cursor);
            }
        })?;
    }

    {
        let handle = Rc::clone(&view);
        listen(&view.image, "dragstart", move |event: Event| {
            if handle.state.borrow().zoom() > 1.0 {
                event.prevent_default();
            }
        })?;
    }

    {
        let handle = Rc::clone(&view);
        listen(&view.image, "wheel", move |event: Event| {
            event.prevent_default();
            if let Some(wheel) = event.dyn_ref::<WheelEvent>() {
                handle.apply(Command::from_wheel(wheel.delta_y()));
            }
        })?;
    }

    {
        let handle = Rc::clone(&view);
        listen(document, "pointermove", move |event: Event| {
            let Some((x, y)) = pointer_position(&event) else {
                return;
            };
            let moved = handle.state.borrow_mut().drag_to(x, y);
            if moved {
                handle.render_transform();
            }
        })?;
    }

    for release in ["pointerup", "pointercancel"] {
        let handle = Rc::clone(&view);
        listen(document, release, move |_event: Event| {
            let cursor = handle.state.borrow_mut().end_drag();
            handle.set_cursor(cursor);
        })?;
    }

    {
        let handle = Rc::clone(&view);
        listen(&view.root, "click", move |event: Event| {
            let Some(target) = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
            else {
                return;
            };
            let on_overlay = target.get_attribute("data-action").as_deref() == Some(CLOSE_ACTION);
            let on_close_button = target.closest(CLOSE_SELECTOR).ok().flatten().is_some();
            if on_overlay || on_close_button {
                handle.close();
            }
        })?;
    }

    {
        let handle = Rc::clone(&view);
        listen(document, "keydown", move |event: Event| {
            if !handle.state.borrow().is_open() {
                return;
            }
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                return;
            };
            if let Some(command) = Command::from_key(&key) {
                handle.apply(command);
            }
        })?;
    }

    Ok(Installed::Wired)
}

struct ContactFields {
    name: HtmlInputElement,
    email: HtmlInputElement,
    message: HtmlTextAreaElement,
    submit: HtmlButtonElement,
}

impl ContactFields {
    fn refresh(&self) {
        let enabled = submit_enabled(&self.name.value(), &self.email.value(), &self.message.value());
        self.submit.set_disabled(!enabled);
    }
}

fn install_contact_gating(document: &Document, _config: &SiteConfig) -> Result<Installed, JsValue> {
    let Some(form) = document.get_element_by_id(FORM_ID) else {
        return Ok(Installed::Skipped("missing #contactForm"));
    };

    let name = form
        .query_selector(NAME_SELECTOR)?
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok());
    let email = form
        .query_selector(EMAIL_SELECTOR)?
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok());
    let message = form
        .query_selector(MESSAGE_SELECTOR)?
        .and_then(|element| element.dyn_into::<HtmlTextAreaElement>().ok());
    let submit = form
        .query_selector(SUBMIT_SELECTOR)?
        .and_then(|element| element.dyn_into::<HtmlButtonElement>().ok());
    let (Some(name), Some(email), Some(message), Some(submit)) = (name, email, message, submit)
    else {
        return Ok(Installed::Skipped("incomplete #contactForm"));
    };

    let fields = Rc::new(ContactFields {
        name,
        email,
        message,
        submit,
    });
    fields.refresh();

    let inputs: [EventTarget; 3] = [
        fields.name.clone().into(),
        fields.email.clone().into(),
        fields.message.clone().into(),
    ];
    for input in inputs {
        let fields = Rc::clone(&fields);
        listen(&input, "input", move |_event: Event| fields.refresh())?;
    }

    Ok(Installed::Wired)
}
