//! DOM for the guessing screen. Elements are created once (or reused when the
//! host page already has them) and toggled by `render` from controller state.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlFormElement, HtmlImageElement, HtmlInputElement};

use crate::game::{GameController, Phase};

const SILHOUETTE_STYLE: &str = "width:288px; height:288px; image-rendering:pixelated; filter:brightness(0);";
const REVEALED_STYLE: &str = "width:288px; height:288px; image-rendering:pixelated;";

pub struct View {
    pub loading: HtmlElement,
    pub unavailable: HtmlElement,
    pub sprite: HtmlImageElement,
    pub mystery: HtmlElement,
    pub reveal: HtmlElement,
    pub form: HtmlFormElement,
    pub input: HtmlInputElement,
    pub reload: HtmlElement,
    pub again: HtmlElement,
}

// Create / reuse element by id under `parent`.
fn ensure<T: JsCast>(
    doc: &Document,
    parent: &Element,
    tag: &str,
    id: &str,
    style: &str,
) -> Result<T, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el.dyn_into()?);
    }
    let el = doc.create_element(tag)?;
    el.set_id(id);
    el.set_attribute("style", style)?;
    parent.append_child(&el)?;
    Ok(el.dyn_into()?)
}

impl View {
    pub fn mount(doc: &Document) -> Result<Self, JsValue> {
        let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
        let root: HtmlElement = ensure(
            doc,
            &body,
            "div",
            "sg-root",
            "max-width:420px; margin:40px auto; text-align:center; font-family:'Fira Code', monospace; color:#eee;",
        )?;

        let loading: HtmlElement = ensure(doc, &root, "div", "sg-loading", "padding:24px; font-size:18px;")?;
        loading.set_text_content(Some("Loading Pokémon..."));

        let unavailable: HtmlElement = ensure(doc, &root, "div", "sg-unavailable", "padding:24px; font-size:16px; color:#ffd166;")?;
        unavailable.set_text_content(Some("No sprite available, try reload."));

        let sprite: HtmlImageElement = ensure(doc, &root, "img", "sg-sprite", SILHOUETTE_STYLE)?;
        sprite.set_alt("pokemon");

        let mystery: HtmlElement = ensure(doc, &root, "div", "sg-mystery", "font-size:48px; font-weight:bold; color:#ffd166;")?;
        mystery.set_text_content(Some("?"));

        let reveal: HtmlElement = ensure(doc, &root, "p", "sg-reveal", "font-size:28px; text-transform:capitalize;")?;

        let form: HtmlFormElement = ensure(doc, &root, "form", "sg-form", "margin-top:16px;")?;
        let input: HtmlInputElement = ensure(doc, &form, "input", "sg-guess", "font-size:16px; padding:4px 8px;")?;
        input.set_type("text");
        input.set_name("pokemon");
        input.set_autofocus(true);
        let submit: HtmlElement = ensure(doc, &form, "button", "sg-submit", "font-size:16px;")?;
        submit.set_attribute("type", "submit")?;
        submit.set_text_content(Some("Guess"));
        let reload: HtmlElement = ensure(doc, &form, "button", "sg-reload", "font-size:16px;")?;
        reload.set_attribute("type", "button")?;
        reload.set_attribute("title", "Another one")?;
        reload.set_text_content(Some("↻"));

        let again: HtmlElement = ensure(doc, &root, "button", "sg-again", "font-size:16px; margin-top:16px;")?;
        again.set_text_content(Some("Guess another"));

        Ok(Self { loading, unavailable, sprite, mystery, reveal, form, input, reload, again })
    }

    pub fn guess_text(&self) -> String {
        self.input.value()
    }

    pub fn render(&self, game: &GameController) {
        let phase = game.phase();
        // A failed catalog load leaves the loading indicator up.
        let waiting = matches!(phase, Phase::Loading | Phase::Probing | Phase::Failed);
        let solved = phase == Phase::Solved;

        self.loading.set_hidden(!waiting);
        self.unavailable.set_hidden(phase != Phase::Unavailable);

        match game.resolved_url() {
            Some(url) => {
                if self.sprite.src() != url {
                    self.sprite.set_src(url);
                }
                self.sprite.set_hidden(false);
            }
            None => {
                self.sprite.remove_attribute("src").ok();
                self.sprite.set_hidden(true);
            }
        }
        let style = if solved { REVEALED_STYLE } else { SILHOUETTE_STYLE };
        self.sprite.set_attribute("style", style).ok();

        self.mystery.set_hidden(phase != Phase::Ready);
        match game.revealed_name() {
            Some(name) => self.reveal.set_text_content(Some(format!("It's {name}!").as_str())),
            None => self.reveal.set_text_content(None),
        }
        self.reveal.set_hidden(!solved);

        self.form.set_hidden(solved);
        self.again.set_hidden(!solved);
        if phase == Phase::Ready {
            self.input.focus().ok();
        }
    }
}
