use std::rc::Rc;

use anyhow::Result;
use js_sys::Uint8Array;
use pdflayer_core::{
    key_command, Command, MemoryPreferenceBackend, Notifier, ParticleField, PreferenceBackend,
    Viewer, ViewerConfig, ViewerParts,
};
use pdflayer_dom::{particle_elements, ElementSink, ElementSurface};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Event, EventTarget, File, HtmlButtonElement, HtmlInputElement, KeyboardEvent};

use crate::dom::{self, element_by_id, typed_by_id, AlertNotifier, BodyTheme, DomControls, DomSink};
use crate::pdfjs::{js_error, PdfJsProvider};
use crate::storage::LocalStoragePreferences;

/// Wires the viewer to the page's elements. Listeners stay registered for the
/// lifetime of the page.
pub fn mount(config: &ViewerConfig) -> Result<Rc<Viewer>> {
    let document = dom::document()?;
    let ids = &config.elements;

    let container = element_by_id(&document, &ids.container)?;
    let file_input: HtmlInputElement = typed_by_id(&document, &ids.file_input)?;
    let prev: HtmlButtonElement = typed_by_id(&document, &ids.prev_button)?;
    let next: HtmlButtonElement = typed_by_id(&document, &ids.next_button)?;
    let page_info = element_by_id(&document, &ids.page_info)?;
    let toggle = element_by_id(&document, &ids.theme_toggle)?;
    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("document has no body"))?;

    let preferences: Rc<dyn PreferenceBackend> = match LocalStoragePreferences::open() {
        Ok(storage) => Rc::new(storage),
        Err(err) => {
            warn!(?err, "localStorage unavailable; theme will not persist");
            Rc::new(MemoryPreferenceBackend::new())
        }
    };

    let viewer = Rc::new(Viewer::new(
        config,
        ViewerParts {
            provider: Rc::new(PdfJsProvider::new()),
            surface: Rc::new(ElementSurface::new(DomSink::new(
                document.clone(),
                container,
            ))),
            controls: Rc::new(DomControls::new(page_info, prev.clone(), next.clone())),
            notifier: Rc::new(AlertNotifier),
            theme: Rc::new(BodyTheme::new(body, toggle.clone())),
            preferences,
        },
    ));
    if let Err(err) = viewer.startup() {
        warn!(?err, "could not apply stored theme");
    }

    mount_particles(&document, config);

    let input = file_input.clone();
    let on_file = Rc::clone(&viewer);
    listen(&file_input, "change", move |_event| {
        let viewer = Rc::clone(&on_file);
        let file = input.files().and_then(|files| files.get(0));
        spawn_local(async move { load_file(&viewer, file).await });
    })?;

    listen_command(&prev, "click", Rc::clone(&viewer), Command::PrevPage)?;
    listen_command(&next, "click", Rc::clone(&viewer), Command::NextPage)?;
    listen_command(&toggle, "click", Rc::clone(&viewer), Command::ToggleDarkMode)?;

    let on_key = Rc::clone(&viewer);
    listen(&document, "keydown", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if typing_into_field(event) {
            return;
        }
        if let Some(command) = key_command(&event.key()) {
            event.prevent_default();
            run_command(Rc::clone(&on_key), command);
        }
    })?;

    info!("viewer mounted");
    Ok(viewer)
}

fn listen(target: &EventTarget, kind: &str, handler: impl FnMut(Event) + 'static) -> Result<()> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        .map_err(js_error)?;
    closure.forget();
    Ok(())
}

fn listen_command(
    target: &EventTarget,
    kind: &str,
    viewer: Rc<Viewer>,
    command: Command,
) -> Result<()> {
    listen(target, kind, move |_event| {
        run_command(Rc::clone(&viewer), command)
    })
}

fn run_command(viewer: Rc<Viewer>, command: Command) {
    spawn_local(async move {
        if let Err(err) = viewer.apply(command).await {
            warn!(?err, ?command, "command failed");
        }
    });
}

fn typing_into_field(event: &KeyboardEvent) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .map(|element| matches!(element.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT"))
        .unwrap_or(false)
}

async fn load_file(viewer: &Viewer, file: Option<File>) {
    let bytes = match file {
        Some(file) => match read_file(&file).await {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                error!(?err, name = %file.name(), "failed to read selected file");
                AlertNotifier.alert(&format!("Error loading PDF: {err}"));
                return;
            }
        },
        None => None,
    };
    if let Err(err) = viewer.load_document(bytes).await {
        // Already logged and surfaced to the user by the viewer.
        debug!(%err, "load finished with error");
    }
}

async fn read_file(file: &File) -> Result<Vec<u8>> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(js_error)?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

fn mount_particles(document: &Document, config: &ViewerConfig) {
    let Some(container) = document.get_element_by_id(&config.elements.particles) else {
        debug!("no particle container; skipping decorations");
        return;
    };
    let mut rng = StdRng::from_entropy();
    let field = ParticleField::generate(config.decor.particle_count, &mut rng);
    let sink = DomSink::new(document.clone(), container);
    let mounted = sink.clear().and_then(|()| {
        particle_elements(&field)
            .iter()
            .try_for_each(|particle| sink.append(particle))
    });
    if let Err(err) = mounted {
        warn!(?err, "failed to mount particles");
    }
}
