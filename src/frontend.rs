mod browser;
mod content;

use std::rc::Rc;

use gloo_console::log;
use tracing::Level;
use tracing_wasm::WASMLayerConfigBuilder;
use wasm_bindgen::JsCast;
use web_sys::{window, Element, Event, HtmlInputElement, HtmlTextAreaElement, KeyboardEvent};
use yew::prelude::*;

use crate::{
    contact::{ContactSink, Field, SimulatedSink},
    events::{ClickTarget, Key, UiEvent},
    filter::ENTRANCE_ANIMATION,
    page::{field_error_class, Notify, Page},
    reveal::{REVEAL_CLASS, REVEAL_ROOT_MARGIN, REVEAL_THRESHOLD},
};

use browser::{
    apply_effects, apply_theme, apply_theme_with_transition, focus_position, image_target,
    observe, sample_scroll, section_target, section_top, BrowserScheduler, BrowserStore, Dispatch,
    GtagTracker, HttpSink, Listener, ObserveOptions,
};
use content::{ABOUT_BOXES, FILTERS, NAV_SECTIONS, PROJECTS, SKILLS};

type BrowserPage = Page<BrowserScheduler, BrowserStore>;

const RESUME_HREF: &str = "/assets/pdf/resume.pdf";
const IMAGE_PLACEHOLDER: &str = "/assets/img/placeholder.svg";

fn contact_sink() -> Rc<dyn ContactSink> {
    match option_env!("PORTFOLIO_CONTACT_ENDPOINT")
        .map(str::trim)
        .filter(|endpoint| !endpoint.is_empty())
    {
        Some(endpoint) => Rc::new(HttpSink::new(endpoint)),
        None => Rc::new(SimulatedSink),
    }
}

fn click(dispatch: &Dispatch, target: ClickTarget) -> Callback<MouseEvent> {
    let dispatch = dispatch.clone();
    Callback::from(move |event: MouseEvent| {
        let effects = dispatch(UiEvent::Click(target.clone()));
        apply_effects(&effects, &event, None);
    })
}

fn field_input(dispatch: &Dispatch, field: Field) -> Callback<InputEvent> {
    let dispatch = dispatch.clone();
    Callback::from(move |event: InputEvent| {
        let value = match field {
            Field::Message => event.target_unchecked_into::<HtmlTextAreaElement>().value(),
            Field::Name | Field::Email => event.target_unchecked_into::<HtmlInputElement>().value(),
        };
        dispatch(UiEvent::Input { field, value });
    })
}

#[derive(Properties, PartialEq)]
struct ExternalLinkProps {
    href: AttrValue,
    label: AttrValue,
    icon: AttrValue,
}

#[function_component(ExternalLink)]
fn external_link(props: &ExternalLinkProps) -> Html {
    html! {
        <a
            class="footer__social-link"
            href={props.href.clone()}
            target="_blank"
            rel="noopener noreferrer"
            aria-label={props.label.clone()}
        >
            <i class={classes!("fab", props.icon.to_string())} aria-hidden="true"></i>
            <span class="sr-only">{" (opens in a new tab)"}</span>
        </a>
    }
}

#[function_component(App)]
fn app() -> Html {
    let force_update = use_force_update();
    let page = use_memo((), move |_| {
        let notify: Notify = Rc::new(move || force_update.force_update());
        BrowserPage::mount(
            content::page_content(),
            BrowserScheduler,
            BrowserStore,
            contact_sink(),
            Rc::new(GtagTracker),
            notify,
        )
    });
    let dispatch: Dispatch = {
        let page = page.clone();
        Rc::new(move |event: UiEvent| page.dispatch(event))
    };
    let menu_ref = use_node_ref();

    {
        let current = page.theme().theme;
        use_effect_with((), move |_| {
            apply_theme(current);
            || ()
        });
    }

    {
        let dispatch = dispatch.clone();
        use_effect_with((), move |_| {
            let document = window().and_then(|w| w.document());
            let mut listeners = Vec::new();

            if let Some(win) = window() {
                let on_scroll = dispatch.clone();
                listeners.extend(Listener::new(win.clone().into(), "scroll", move |_| {
                    if let Some(sample) = sample_scroll() {
                        on_scroll(UiEvent::Scroll(sample));
                    }
                }));

                if document.as_ref().is_some_and(|d| d.ready_state() == "complete") {
                    dispatch(UiEvent::Load);
                } else {
                    let on_load = dispatch.clone();
                    listeners.extend(Listener::new(win.into(), "load", move |_| {
                        on_load(UiEvent::Load);
                    }));
                }
            }

            if let Some(document) = document {
                let on_key = dispatch.clone();
                listeners.extend(Listener::new(document.into(), "keydown", move |event: Event| {
                    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    if event.key() == "Escape" {
                        on_key(UiEvent::KeyPress(Key::Escape));
                    }
                }));
            }

            let observers: Vec<_> = [
                observe(
                    "section[id]",
                    Some(ObserveOptions {
                        threshold: REVEAL_THRESHOLD,
                        root_margin: REVEAL_ROOT_MARGIN,
                    }),
                    section_target,
                    dispatch.clone(),
                ),
                observe("img[data-src]", None, image_target, dispatch),
            ]
            .into_iter()
            .flatten()
            .collect();

            move || {
                drop(observers);
                drop(listeners);
            }
        });
    }

    let on_menu_keydown = {
        let dispatch = dispatch.clone();
        let menu_ref = menu_ref.clone();
        Callback::from(move |event: KeyboardEvent| {
            if event.key() != "Tab" {
                return;
            }
            let Some(menu) = menu_ref.cast::<Element>() else {
                return;
            };
            let effects = dispatch(UiEvent::KeyPress(Key::Tab {
                shift: event.shift_key(),
                focus: focus_position(&menu),
            }));
            apply_effects(&effects, &event, Some(&menu));
        })
    };

    let on_theme_toggle = {
        let dispatch = dispatch.clone();
        let page = page.clone();
        Callback::from(move |_: MouseEvent| {
            dispatch(UiEvent::Click(ClickTarget::ThemeToggle));
            apply_theme_with_transition(page.theme().theme);
        })
    };

    let on_submit = {
        let dispatch = dispatch.clone();
        Callback::from(move |event: SubmitEvent| {
            let effects = dispatch(UiEvent::Submit);
            apply_effects(&effects, &event, None);
        })
    };

    let scroll = page.scroll();
    let theme = page.theme();
    let form = page.form();
    let banner = page.banner();
    let section_class = |base: &'static str, id: &str| {
        classes!("section", base, page.is_revealed(id).then_some(REVEAL_CLASS))
    };

    let nav_links = NAV_SECTIONS.iter().map(|section| {
        let onclick = {
            let dispatch = dispatch.clone();
            let id = section.id;
            Callback::from(move |event: MouseEvent| {
                let effects = dispatch(UiEvent::Click(ClickTarget::NavLink {
                    section: id.to_string(),
                    top: section_top(id),
                }));
                apply_effects(&effects, &event, None);
            })
        };
        let active = scroll.active_section.as_deref() == Some(section.id);
        html! {
            <li class="nav__item">
                <a
                    href={format!("#{}", section.id)}
                    class={classes!("nav__link", active.then_some("active-link"))}
                    {onclick}
                >
                    <i class={classes!("fas", section.icon, "nav__icon")}></i>
                    {section.label}
                </a>
            </li>
        }
    });

    let about_boxes = ABOUT_BOXES.iter().enumerate().map(|(index, about)| {
        let subtitle = page
            .counter_text(index)
            .unwrap_or_else(|| about.subtitle.to_string());
        html! {
            <div class="about__box">
                <i class={classes!("fas", about.icon, "about__icon")}></i>
                <h3 class="about__title">{about.title}</h3>
                <span class="about__subtitle">{subtitle}</span>
            </div>
        }
    });

    let skill_bars = SKILLS.iter().enumerate().map(|(index, (name, percentage))| {
        html! {
            <div class="skills__data">
                <div class="skills__titles">
                    <h3 class="skills__name">{*name}</h3>
                    <span class="skills__number">{format!("{percentage}%")}</span>
                </div>
                <div class="skills__bar">
                    <span
                        class="skills__percentage"
                        data-percentage={percentage.to_string()}
                        style={page.skill_width_style(index)}
                    ></span>
                </div>
            </div>
        }
    });

    let active_filter = page.active_filter();
    let filter_buttons = FILTERS.iter().map(|(value, label)| {
        html! {
            <button
                type="button"
                class={classes!("projects__filter-btn", (active_filter == *value).then_some("active"))}
                data-filter={*value}
                onclick={click(&dispatch, ClickTarget::Filter(value.to_string()))}
            >
                {*label}
            </button>
        }
    });

    let project_cards = PROJECTS.iter().enumerate().map(|(index, project)| {
        let card = page.card(index);
        let image_id = content::project_image_id(index);
        let loaded = page.image_source(&image_id);
        let (src, data_src) = match loaded {
            Some(source) => (source, None),
            None => (IMAGE_PLACEHOLDER.to_string(), Some(project.image)),
        };
        html! {
            <article
                class={classes!("project__card", (!card.shown).then_some("hide"))}
                data-category={project.category}
                style={card.animated.then_some(ENTRANCE_ANIMATION)}
            >
                <img id={image_id} class="project__img" {src} data-src={data_src} alt={project.title} />
                <div class="project__data">
                    <h3 class="project__title">{project.title}</h3>
                    <p class="project__description">{project.description}</p>
                    <div class="project__tags">
                        { for project.tags.iter().map(|tag| html! { <span class="project__tag">{*tag}</span> }) }
                    </div>
                    <div class="project__links">
                        <a href={project.demo} class="project__link">{"Live Demo"}</a>
                        <a href={project.source} class="project__link" target="_blank" rel="noopener noreferrer">{"Source"}</a>
                    </div>
                </div>
            </article>
        }
    });

    let field_error = |field: Field| {
        html! {
            <span class="contact__error" id={field.error_slot_id()}>
                {form.error(field).unwrap_or_default()}
            </span>
        }
    };

    html! {
        <>
            <div id="loader" class={classes!("loader", page.is_loaded().then_some("hidden"))}>
                <div class="loader__spinner"></div>
            </div>
            <div id="scrollProgress" class="scroll-progress" style={scroll.progress_style()}></div>

            <header id="header" class={classes!("header", scroll.header_scrolled.then_some("scroll-header"))}>
                <nav class="nav container">
                    <a href="#home" class="nav__logo">{"Portfolio"}</a>
                    <div
                        id="navMenu"
                        ref={menu_ref}
                        class={classes!("nav__menu", page.menu_open().then_some("show-menu"))}
                        onkeydown={on_menu_keydown}
                    >
                        <ul class="nav__list">
                            { for nav_links }
                        </ul>
                        <button
                            id="navClose"
                            type="button"
                            class="nav__close"
                            aria-label="Close menu"
                            onclick={click(&dispatch, ClickTarget::MenuClose)}
                        >
                            <i class="fas fa-xmark"></i>
                        </button>
                    </div>
                    <div class="nav__buttons">
                        <button
                            id="themeToggle"
                            type="button"
                            class="theme-toggle"
                            aria-label={theme.theme.toggle_label()}
                            aria-pressed={theme.theme.pressed().to_string()}
                            onclick={on_theme_toggle}
                        >
                            <i class={classes!("fas", theme.icon.class_name())}></i>
                        </button>
                        <button
                            id="navToggle"
                            type="button"
                            class="nav__toggle"
                            aria-label="Open menu"
                            aria-expanded={page.menu_open().to_string()}
                            onclick={click(&dispatch, ClickTarget::MenuToggle)}
                        >
                            <i class="fas fa-bars"></i>
                        </button>
                    </div>
                </nav>
            </header>

            <main class="main">
                <section id="home" class={section_class("home", "home")}>
                    <div class="home__container container">
                        <div class="home__data">
                            <h1 class="home__title">{"Hi, I'm a developer"}</h1>
                            <h2 class="home__subtitle">
                                <span id="typingText" class="typing-text">{page.typed_text()}</span>
                                <span class="typing-cursor" aria-hidden="true">{"|"}</span>
                            </h2>
                            <div class="home__buttons">
                                <a href="#contact" class="button">{"Contact Me"}</a>
                                <a
                                    href={RESUME_HREF}
                                    class="button button--ghost"
                                    download=""
                                    onclick={click(&dispatch, ClickTarget::ResumeDownload)}
                                >
                                    {"Download CV"}
                                </a>
                            </div>
                        </div>
                        <div class="home__image" style={scroll.parallax_style()}>
                            <img src="/assets/img/profile.png" alt="Profile" />
                        </div>
                    </div>
                </section>

                <section id="about" class={section_class("about", "about")}>
                    <h2 class="section__title">{"About Me"}</h2>
                    <div class="about__info container">
                        { for about_boxes }
                    </div>
                </section>

                <section id="skills" class={section_class("skills", "skills")}>
                    <h2 class="section__title">{"Skills"}</h2>
                    <div class="skills__container container">
                        { for skill_bars }
                    </div>
                </section>

                <section id="projects" class={section_class("projects", "projects")}>
                    <h2 class="section__title">{"Projects"}</h2>
                    <div class="projects__filters container">
                        { for filter_buttons }
                    </div>
                    <div class="projects__container container">
                        { for project_cards }
                    </div>
                </section>

                <section id="contact" class={section_class("contact", "contact")}>
                    <h2 class="section__title">{"Get In Touch"}</h2>
                    <form id="contactForm" class="contact__form container" novalidate="novalidate" onsubmit={on_submit}>
                        <div class="contact__field">
                            <label for="name" class="contact__label">{"Name"}</label>
                            <input
                                id="name"
                                type="text"
                                class={classes!("contact__input", field_error_class(&form, Field::Name))}
                                value={form.value(Field::Name).to_string()}
                                oninput={field_input(&dispatch, Field::Name)}
                            />
                            { field_error(Field::Name) }
                        </div>
                        <div class="contact__field">
                            <label for="email" class="contact__label">{"Email"}</label>
                            <input
                                id="email"
                                type="email"
                                class={classes!("contact__input", field_error_class(&form, Field::Email))}
                                value={form.value(Field::Email).to_string()}
                                oninput={field_input(&dispatch, Field::Email)}
                            />
                            { field_error(Field::Email) }
                        </div>
                        <div class="contact__field">
                            <label for="message" class="contact__label">{"Message"}</label>
                            <textarea
                                id="message"
                                rows="6"
                                class={classes!("contact__input", field_error_class(&form, Field::Message))}
                                value={form.value(Field::Message).to_string()}
                                oninput={field_input(&dispatch, Field::Message)}
                            />
                            { field_error(Field::Message) }
                        </div>
                        <button type="submit" class="button">{"Send Message"}</button>
                        <p id="contactMessage" class={banner.class()}>{banner.text().unwrap_or_default()}</p>
                    </form>
                </section>
            </main>

            <footer class="footer">
                <div class="footer__social container">
                    <ExternalLink href="https://github.com/" label="GitHub" icon="fa-github" />
                    <ExternalLink href="https://www.linkedin.com/" label="LinkedIn" icon="fa-linkedin-in" />
                </div>
            </footer>

            <button
                id="backToTop"
                type="button"
                class={classes!("back-to-top", scroll.back_to_top.then_some("show"))}
                aria-label="Back to top"
                onclick={click(&dispatch, ClickTarget::BackToTop)}
            >
                <i class="fas fa-arrow-up"></i>
            </button>
        </>
    }
}

fn welcome() {
    log!(
        "%c\u{1F44B} Welcome to my Portfolio!",
        "color: #6366f1; font-size: 20px; font-weight: bold;"
    );
    log!(
        "%cLooking for developers? Let's connect!",
        "color: #8b5cf6; font-size: 14px;"
    );
    log!(
        "%cEmail: your.email@example.com",
        "color: #06b6d4; font-size: 12px;"
    );
}

fn init_tracing() {
    let config = WASMLayerConfigBuilder::new()
        .set_max_level(Level::INFO)
        .build();
    tracing_wasm::set_as_global_default_with_config(config);
}

pub fn run() {
    init_tracing();
    welcome();
    let Some(root) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("app"))
    else {
        log!("missing #app mount point");
        return;
    };
    yew::Renderer::<App>::with_root(root).render();
    log!("Portfolio website loaded successfully!");
}
