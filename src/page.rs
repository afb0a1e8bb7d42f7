use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use tracing::{info, warn};

use crate::{
    analytics::{Tracker, RESUME_DOWNLOAD},
    contact::{Banner, ContactForm, ContactSink, Field, BANNER_HIDE_MS},
    events::{ClickTarget, Effect, EventBus, EventKind, Key, ObservedTarget, Subscription, UiEvent},
    filter::{CardVisibility, ProjectFilter},
    metrics::{Counters, SkillBar, SkillBars, COUNTER_TICK_MS},
    nav::{MenuInput, NavMenu},
    reveal::{LazyImages, Reveal, RevealTracker},
    schedule::{Debounced, ScheduledLoop, Scheduler},
    scroll::{nav_scroll_target, ScrollView, SETTLE_DEBOUNCE_MS},
    store::KeyValueStore,
    theme::{ThemeManager, ThemeState},
    typing::{TypingAnimator, START_DELAY_MS},
};

pub const SKILLS_SECTION: &str = "skills";
pub const ABOUT_SECTION: &str = "about";

pub type Notify = Rc<dyn Fn()>;

#[derive(Clone, Debug, Default)]
pub struct PageContent {
    pub phrases: Vec<String>,
    pub skills: Vec<SkillBar>,
    pub counters: Vec<String>,
    pub project_categories: Vec<String>,
    pub deferred_images: Vec<(String, String)>,
}

struct ViewState<K> {
    loaded: Cell<bool>,
    scroll: RefCell<ScrollView>,
    nav: RefCell<NavMenu>,
    theme: RefCell<ThemeManager<K>>,
    typed: RefCell<String>,
    reveal: RefCell<RevealTracker>,
    images: RefCell<LazyImages>,
    skills: RefCell<SkillBars>,
    counters: RefCell<Counters>,
    filter: RefCell<ProjectFilter>,
    contact: RefCell<ContactForm>,
    banner: Cell<Banner>,
}

struct Timers<S: Scheduler> {
    scheduler: S,
    settle: Debounced<S>,
    typing: RefCell<Option<ScheduledLoop<S>>>,
    counters: RefCell<Vec<ScheduledLoop<S>>>,
    banner: RefCell<Option<S::Handle>>,
}

pub struct Page<S: Scheduler, K> {
    bus: EventBus,
    state: Rc<ViewState<K>>,
    timers: Rc<Timers<S>>,
    _subscriptions: Vec<Subscription>,
}

struct Wiring<S: Scheduler, K> {
    bus: EventBus,
    state: Rc<ViewState<K>>,
    timers: Rc<Timers<S>>,
    notify: Notify,
}

impl<S: Scheduler, K: KeyValueStore + 'static> Page<S, K> {
    pub fn mount(
        content: PageContent,
        scheduler: S,
        store: K,
        sink: Rc<dyn ContactSink>,
        tracker: Rc<dyn Tracker>,
        notify: Notify,
    ) -> Self {
        let mut theme = ThemeManager::new(store);
        if let Err(error) = theme.restore() {
            warn!(%error, "could not restore theme");
        }

        let mut images = LazyImages::default();
        for (image_id, source) in content.deferred_images {
            images.defer(image_id, source);
        }

        let state = Rc::new(ViewState {
            loaded: Cell::new(false),
            scroll: RefCell::new(ScrollView::default()),
            nav: RefCell::new(NavMenu::default()),
            theme: RefCell::new(theme),
            typed: RefCell::new(String::new()),
            reveal: RefCell::new(RevealTracker::default()),
            images: RefCell::new(images),
            skills: RefCell::new(SkillBars::new(content.skills)),
            counters: RefCell::new(Counters::new(content.counters)),
            filter: RefCell::new(ProjectFilter::new(content.project_categories)),
            contact: RefCell::new(ContactForm::default()),
            banner: Cell::new(Banner::Hidden),
        });

        let timers = Rc::new(Timers {
            settle: Debounced::new(scheduler.clone(), SETTLE_DEBOUNCE_MS),
            scheduler,
            typing: RefCell::new(None),
            counters: RefCell::new(Vec::new()),
            banner: RefCell::new(None),
        });

        let wiring = Wiring {
            bus: EventBus::new(),
            state,
            timers,
            notify,
        };

        let subscriptions = vec![
            wiring.loader(),
            wiring.scroll_reactor(),
            wiring.back_to_top(),
            wiring.nav_clicks(),
            wiring.nav_keys(),
            wiring.theme_toggle(),
            wiring.reveal_sections(),
            wiring.lazy_images(),
            wiring.metrics(),
            wiring.project_filter(),
            wiring.contact_input(),
            wiring.contact_submit(sink),
            wiring.resume_tracking(tracker),
        ];
        wiring.start_typing(&content.phrases);

        Self {
            bus: wiring.bus,
            state: wiring.state,
            timers: wiring.timers,
            _subscriptions: subscriptions,
        }
    }

    pub fn dispatch(&self, event: UiEvent) -> Vec<Effect> {
        self.bus.dispatch(&event)
    }

    pub fn stop_typing(&self) {
        if let Some(typing) = self.timers.typing.borrow_mut().take() {
            typing.cancel();
        }
    }

    pub fn is_typing(&self) -> bool {
        self.timers
            .typing
            .borrow()
            .as_ref()
            .is_some_and(ScheduledLoop::is_running)
    }

    pub fn is_loaded(&self) -> bool {
        self.state.loaded.get()
    }

    pub fn scroll(&self) -> ScrollView {
        self.state.scroll.borrow().clone()
    }

    pub fn menu_open(&self) -> bool {
        self.state.nav.borrow().is_open()
    }

    pub fn theme(&self) -> ThemeState {
        self.state.theme.borrow().current()
    }

    pub fn typed_text(&self) -> String {
        self.state.typed.borrow().clone()
    }

    pub fn is_revealed(&self, section_id: &str) -> bool {
        self.state.reveal.borrow().is_visible(section_id)
    }

    pub fn image_source(&self, image_id: &str) -> Option<String> {
        self.state.images.borrow().source(image_id).map(str::to_string)
    }

    pub fn skill_width_style(&self, index: usize) -> String {
        self.state.skills.borrow().width_style(index)
    }

    pub fn counter_text(&self, index: usize) -> Option<String> {
        self.state.counters.borrow().text(index)
    }

    pub fn active_filter(&self) -> String {
        self.state.filter.borrow().active().to_string()
    }

    pub fn card(&self, index: usize) -> CardVisibility {
        self.state.filter.borrow().card(index)
    }

    pub fn form(&self) -> ContactForm {
        self.state.contact.borrow().clone()
    }

    pub fn banner(&self) -> Banner {
        self.state.banner.get()
    }
}

impl<S: Scheduler, K: KeyValueStore + 'static> Wiring<S, K> {
    fn on(
        &self,
        kind: EventKind,
        handler: impl Fn(&ViewState<K>, &Timers<S>, &Notify, &UiEvent, &mut Vec<Effect>) + 'static,
    ) -> Subscription {
        let state = self.state.clone();
        let timers = self.timers.clone();
        let notify = self.notify.clone();
        self.bus.subscribe(kind, move |event, effects| {
            handler(&state, &timers, &notify, event, effects)
        })
    }

    fn loader(&self) -> Subscription {
        self.on(EventKind::Load, |state, _, notify, _, _| {
            state.loaded.set(true);
            notify();
        })
    }

    fn scroll_reactor(&self) -> Subscription {
        let state = self.state.clone();
        self.on(EventKind::Scroll, move |_, timers, notify, event, _| {
            let UiEvent::Scroll(sample) = event else {
                return;
            };

            state.scroll.borrow_mut().apply_immediate(sample);
            notify();

            let state = state.clone();
            let notify = notify.clone();
            let sample = sample.clone();
            timers.settle.call(move || {
                state.scroll.borrow_mut().apply_settled(&sample);
                notify();
            });
        })
    }

    fn back_to_top(&self) -> Subscription {
        self.on(EventKind::Click, |_, _, _, event, effects| {
            if matches!(event, UiEvent::Click(ClickTarget::BackToTop)) {
                effects.push(Effect::ScrollTo { top: 0.0 });
            }
        })
    }

    fn nav_clicks(&self) -> Subscription {
        self.on(EventKind::Click, |state, _, notify, event, effects| {
            let UiEvent::Click(target) = event else {
                return;
            };

            let input = match target {
                ClickTarget::MenuToggle => MenuInput::Toggle,
                ClickTarget::MenuClose => MenuInput::Close,
                ClickTarget::NavLink { top, .. } => {
                    effects.push(Effect::PreventDefault);
                    if let Some(top) = top {
                        effects.push(Effect::ScrollTo {
                            top: nav_scroll_target(*top),
                        });
                    }
                    MenuInput::LinkActivated
                }
                _ => return,
            };

            let changed = state.nav.borrow_mut().handle(input);
            if changed {
                notify();
            }
        })
    }

    fn nav_keys(&self) -> Subscription {
        self.on(EventKind::KeyPress, |state, _, notify, event, effects| {
            match event {
                UiEvent::KeyPress(Key::Escape) => {
                    let changed = state.nav.borrow_mut().handle(MenuInput::Escape);
                    if changed {
                        notify();
                    }
                }
                UiEvent::KeyPress(Key::Tab { shift, focus }) => {
                    let target = state.nav.borrow().trap_focus(*focus, *shift);
                    if let Some(target) = target {
                        effects.push(Effect::Focus(target));
                        effects.push(Effect::PreventDefault);
                    }
                }
                _ => {}
            }
        })
    }

    fn theme_toggle(&self) -> Subscription {
        self.on(EventKind::Click, |state, _, notify, event, _| {
            if !matches!(event, UiEvent::Click(ClickTarget::ThemeToggle)) {
                return;
            }

            let result = state.theme.borrow_mut().toggle();
            if let Err(error) = result {
                warn!(%error, "theme applied but not persisted");
            }
            notify();
        })
    }

    fn reveal_sections(&self) -> Subscription {
        self.on(EventKind::Intersect, |state, _, notify, event, _| {
            let UiEvent::Intersect(ObservedTarget::Section(section_id)) = event else {
                return;
            };

            let reveal = state.reveal.borrow_mut().on_intersect(section_id);
            if reveal == Reveal::FirstTime {
                notify();
            }
        })
    }

    fn lazy_images(&self) -> Subscription {
        self.on(EventKind::Intersect, |state, _, notify, event, effects| {
            let UiEvent::Intersect(ObservedTarget::Image(image_id)) = event else {
                return;
            };

            let loaded = state.images.borrow_mut().on_intersect(image_id).is_some();
            effects.push(Effect::Unobserve(image_id.clone()));
            if loaded {
                notify();
            }
        })
    }

    fn metrics(&self) -> Subscription {
        let state = self.state.clone();
        self.on(EventKind::Intersect, move |_, timers, notify, event, _| {
            let UiEvent::Intersect(ObservedTarget::Section(section_id)) = event else {
                return;
            };

            match section_id.as_str() {
                SKILLS_SECTION => {
                    let filled = state.skills.borrow_mut().fill();
                    if filled {
                        notify();
                    }
                }
                ABOUT_SECTION => {
                    let started = state.counters.borrow_mut().begin();
                    let loops: Vec<ScheduledLoop<S>> = started
                        .into_iter()
                        .map(|index| {
                            let state = state.clone();
                            let notify = notify.clone();
                            ScheduledLoop::start(timers.scheduler.clone(), COUNTER_TICK_MS, move || {
                                let next = state.counters.borrow_mut().tick(index);
                                notify();
                                next
                            })
                        })
                        .collect();
                    timers.counters.borrow_mut().extend(loops);
                }
                _ => {}
            }
        })
    }

    fn project_filter(&self) -> Subscription {
        self.on(EventKind::Click, |state, _, notify, event, _| {
            let UiEvent::Click(ClickTarget::Filter(filter)) = event else {
                return;
            };

            state.filter.borrow_mut().select(filter);
            notify();
        })
    }

    fn contact_input(&self) -> Subscription {
        self.on(EventKind::Input, |state, _, notify, event, _| {
            let UiEvent::Input { field, value } = event else {
                return;
            };

            state.contact.borrow_mut().on_input(*field, value.clone());
            notify();
        })
    }

    fn contact_submit(&self, sink: Rc<dyn ContactSink>) -> Subscription {
        let state = self.state.clone();
        let timers = self.timers.clone();
        self.on(EventKind::Submit, move |_, _, notify, _, effects| {
            effects.push(Effect::PreventDefault);

            state.banner.set(Banner::Hidden);
            let pending_hide = timers.banner.borrow_mut().take();
            drop(pending_hide);

            let outcome = state.contact.borrow_mut().submit();
            let payload = match outcome {
                Ok(payload) => payload,
                Err(_) => {
                    notify();
                    return;
                }
            };

            let state = state.clone();
            let timers = timers.clone();
            let notify = notify.clone();
            sink.deliver(
                payload,
                Box::new(move |result| {
                    match result {
                        Ok(()) => {
                            state.banner.set(Banner::Sent);
                            state.contact.borrow_mut().reset();

                            let hide = {
                                let state = state.clone();
                                let notify = notify.clone();
                                timers.scheduler.schedule(
                                    BANNER_HIDE_MS,
                                    Box::new(move || {
                                        state.banner.set(Banner::Hidden);
                                        notify();
                                    }),
                                )
                            };
                            let previous = timers.banner.replace(Some(hide));
                            drop(previous);
                        }
                        Err(error) => {
                            warn!(%error, "contact message was not delivered");
                            state.banner.set(Banner::Failed);
                        }
                    }
                    notify();
                }),
            );
        })
    }

    fn resume_tracking(&self, tracker: Rc<dyn Tracker>) -> Subscription {
        self.on(EventKind::Click, move |_, _, _, event, _| {
            if matches!(event, UiEvent::Click(ClickTarget::ResumeDownload)) {
                info!("resume download initiated");
                tracker.track(&RESUME_DOWNLOAD);
            }
        })
    }

    fn start_typing(&self, phrases: &[String]) {
        let Some(mut animator) = TypingAnimator::new(phrases) else {
            return;
        };

        let state = self.state.clone();
        let notify = self.notify.clone();
        let typing = ScheduledLoop::start(self.timers.scheduler.clone(), START_DELAY_MS, move || {
            let delay = animator.step();
            *state.typed.borrow_mut() = animator.text();
            notify();
            Some(delay)
        });
        *self.timers.typing.borrow_mut() = Some(typing);
    }
}

pub fn field_error_class(form: &ContactForm, field: Field) -> Option<&'static str> {
    form.error(field).map(|_| "error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analytics::RecordingTracker,
        contact::{ContactPayload, DeliveryCallback, DeliveryError, SimulatedSink},
        nav::{FocusPosition, FocusTarget},
        schedule::ManualScheduler,
        scroll::{ScrollSample, SectionBox},
        store::MemoryStore,
        theme::{Theme, ICON_KEY, THEME_KEY},
        typing::PHRASES,
    };

    struct RejectingSink;

    impl ContactSink for RejectingSink {
        fn deliver(&self, _payload: ContactPayload, done: DeliveryCallback) {
            done(Err(DeliveryError::Rejected(503)));
        }
    }

    struct Harness {
        page: Page<ManualScheduler, MemoryStore>,
        scheduler: ManualScheduler,
        store: MemoryStore,
        tracker: RecordingTracker,
        renders: Rc<Cell<usize>>,
    }

    fn content() -> PageContent {
        PageContent {
            phrases: PHRASES.iter().map(|phrase| phrase.to_string()).collect(),
            skills: vec![SkillBar::new("Rust", 85), SkillBar::new("CSS", 70)],
            counters: vec!["120+ Projects".into(), "Remote".into()],
            project_categories: vec!["web".into(), "design".into(), "app".into(), "design".into()],
            deferred_images: vec![("project-0".into(), "/img/p0.jpg".into())],
        }
    }

    fn harness_with(store: MemoryStore, sink: Rc<dyn ContactSink>) -> Harness {
        let scheduler = ManualScheduler::new();
        let tracker = RecordingTracker::default();
        let renders = Rc::new(Cell::new(0));
        let notify: Notify = {
            let renders = renders.clone();
            Rc::new(move || renders.set(renders.get() + 1))
        };

        let page = Page::mount(
            content(),
            scheduler.clone(),
            store.clone(),
            sink,
            Rc::new(tracker.clone()),
            notify,
        );

        Harness {
            page,
            scheduler,
            store,
            tracker,
            renders,
        }
    }

    fn harness() -> Harness {
        harness_with(MemoryStore::new(), Rc::new(SimulatedSink))
    }

    fn type_into(page: &Page<ManualScheduler, MemoryStore>, field: Field, value: &str) {
        page.dispatch(UiEvent::Input {
            field,
            value: value.to_string(),
        });
    }

    fn scroll_to(offset: f64) -> UiEvent {
        UiEvent::Scroll(ScrollSample {
            offset,
            scroll_height: 3_000.0,
            client_height: 1_000.0,
            viewport_height: 1_000.0,
            sections: vec![
                SectionBox { id: "home".into(), top: 0.0, height: 800.0 },
                SectionBox { id: "about".into(), top: 800.0, height: 800.0 },
            ],
        })
    }

    #[test]
    fn load_hides_the_loader() {
        let h = harness();
        assert!(!h.page.is_loaded());

        h.page.dispatch(UiEvent::Load);
        assert!(h.page.is_loaded());
        assert_eq!(h.renders.get(), 1);
    }

    #[test]
    fn scroll_applies_immediate_reactions_and_debounces_the_rest() {
        let h = harness();
        h.page.stop_typing();

        h.page.dispatch(scroll_to(500.0));
        let view = h.page.scroll();
        assert_eq!(view.progress, 25.0);
        assert!(view.back_to_top);
        assert!(!view.header_scrolled);
        assert_eq!(view.active_section, None);

        h.scheduler.advance(30);
        h.page.dispatch(scroll_to(900.0));
        h.scheduler.advance(49);
        assert!(!h.page.scroll().header_scrolled);

        h.scheduler.advance(1);
        let view = h.page.scroll();
        assert!(view.header_scrolled);
        assert_eq!(view.active_section.as_deref(), Some("about"));
    }

    #[test]
    fn nav_link_closes_menu_and_scrolls_below_header() {
        let h = harness();

        h.page.dispatch(UiEvent::Click(ClickTarget::MenuToggle));
        assert!(h.page.menu_open());

        let effects = h.page.dispatch(UiEvent::Click(ClickTarget::NavLink {
            section: "about".into(),
            top: Some(800.0),
        }));
        assert!(!h.page.menu_open());
        assert_eq!(
            effects,
            vec![Effect::PreventDefault, Effect::ScrollTo { top: 720.0 }]
        );
    }

    #[test]
    fn escape_closes_menu_and_tab_is_trapped_while_open() {
        let h = harness();
        let last = FocusPosition { at_first: false, at_last: true };

        let effects = h.page.dispatch(UiEvent::KeyPress(Key::Tab { shift: false, focus: last }));
        assert!(effects.is_empty());

        h.page.dispatch(UiEvent::Click(ClickTarget::MenuToggle));
        let effects = h.page.dispatch(UiEvent::KeyPress(Key::Tab { shift: false, focus: last }));
        assert_eq!(
            effects,
            vec![Effect::Focus(FocusTarget::First), Effect::PreventDefault]
        );

        h.page.dispatch(UiEvent::KeyPress(Key::Escape));
        assert!(!h.page.menu_open());

        h.page.dispatch(UiEvent::Click(ClickTarget::MenuToggle));
        h.page.dispatch(UiEvent::Click(ClickTarget::MenuClose));
        assert!(!h.page.menu_open());
    }

    #[test]
    fn back_to_top_scrolls_to_origin() {
        let h = harness();
        let effects = h.page.dispatch(UiEvent::Click(ClickTarget::BackToTop));
        assert_eq!(effects, vec![Effect::ScrollTo { top: 0.0 }]);
    }

    #[test]
    fn theme_is_restored_on_mount_and_persisted_on_toggle() {
        let store = MemoryStore::with_entries([(THEME_KEY, "dark"), (ICON_KEY, "fa-sun")]);
        let h = harness_with(store, Rc::new(SimulatedSink));
        assert_eq!(h.page.theme().theme, Theme::Dark);

        h.page.dispatch(UiEvent::Click(ClickTarget::ThemeToggle));
        assert_eq!(h.page.theme().theme, Theme::Light);
        assert_eq!(
            h.store.get(THEME_KEY).expect("readable").as_deref(),
            Some("light")
        );
        assert_eq!(
            h.store.get(ICON_KEY).expect("readable").as_deref(),
            Some("fa-moon")
        );
    }

    #[test]
    fn theme_toggle_survives_storage_failure() {
        let store = MemoryStore::new();
        store.reject_writes(true);
        let h = harness_with(store, Rc::new(SimulatedSink));

        h.page.dispatch(UiEvent::Click(ClickTarget::ThemeToggle));
        assert_eq!(h.page.theme().theme, Theme::Dark);
        assert!(h.store.is_empty());
    }

    #[test]
    fn typing_starts_after_a_second_and_can_be_stopped() {
        let h = harness();
        assert_eq!(h.page.typed_text(), "");

        h.scheduler.advance(999);
        assert_eq!(h.page.typed_text(), "");
        h.scheduler.advance(1);
        assert_eq!(h.page.typed_text(), "A");
        h.scheduler.advance(200);
        assert_eq!(h.page.typed_text(), "A ");

        h.page.stop_typing();
        assert!(!h.page.is_typing());
        h.scheduler.advance(10_000);
        assert_eq!(h.page.typed_text(), "A ");
        assert_eq!(h.scheduler.pending(), 0);
    }

    #[test]
    fn reveal_marks_sections_once() {
        let h = harness();
        h.page.stop_typing();
        let section = || UiEvent::Intersect(ObservedTarget::Section("projects".into()));

        h.page.dispatch(section());
        h.page.dispatch(section());
        assert!(h.page.is_revealed("projects"));
        assert_eq!(h.renders.get(), 1);
    }

    #[test]
    fn lazy_image_loads_and_stops_watching() {
        let h = harness();
        let image = || UiEvent::Intersect(ObservedTarget::Image("project-0".into()));
        assert_eq!(h.page.image_source("project-0"), None);

        let effects = h.page.dispatch(image());
        assert_eq!(effects, vec![Effect::Unobserve("project-0".into())]);
        assert_eq!(h.page.image_source("project-0").as_deref(), Some("/img/p0.jpg"));
    }

    #[test]
    fn skill_bars_fill_on_skills_reveal() {
        let h = harness();
        assert_eq!(h.page.skill_width_style(0), "width: 0%;");

        h.page
            .dispatch(UiEvent::Intersect(ObservedTarget::Section(SKILLS_SECTION.into())));
        assert_eq!(h.page.skill_width_style(0), "width: 85%;");
        assert_eq!(h.page.skill_width_style(1), "width: 70%;");
    }

    #[test]
    fn counters_reach_target_and_never_rerun() {
        let h = harness();
        h.page.stop_typing();
        let about = || UiEvent::Intersect(ObservedTarget::Section(ABOUT_SECTION.into()));

        h.page.dispatch(about());
        h.scheduler.advance(30);
        assert_eq!(h.page.counter_text(0).as_deref(), Some("2+ Projects"));

        h.scheduler.advance(30 * 49);
        assert_eq!(h.page.counter_text(0).as_deref(), Some("120+ Projects"));
        assert_eq!(h.page.counter_text(1).as_deref(), Some("Remote"));
        assert_eq!(h.scheduler.pending(), 0);

        h.page.dispatch(about());
        assert_eq!(h.scheduler.pending(), 0);
        h.scheduler.advance(1_000);
        assert_eq!(h.page.counter_text(0).as_deref(), Some("120+ Projects"));
    }

    #[test]
    fn project_filter_shows_matching_cards() {
        let h = harness();

        h.page.dispatch(UiEvent::Click(ClickTarget::Filter("design".into())));
        let shown: Vec<bool> = (0..4).map(|index| h.page.card(index).shown).collect();
        assert_eq!(shown, vec![false, true, false, true]);
        assert_eq!(h.page.active_filter(), "design");

        h.page.dispatch(UiEvent::Click(ClickTarget::Filter("all".into())));
        assert!((0..4).all(|index| h.page.card(index).shown));
    }

    #[test]
    fn valid_submission_resets_form_and_hides_banner_after_five_seconds() {
        let h = harness();
        h.page.stop_typing();
        type_into(&h.page, Field::Name, "Al");
        type_into(&h.page, Field::Email, "a@b.co");
        type_into(&h.page, Field::Message, "1234567890");

        let effects = h.page.dispatch(UiEvent::Submit);
        assert_eq!(effects, vec![Effect::PreventDefault]);
        assert_eq!(h.page.banner(), Banner::Sent);
        assert_eq!(h.page.form(), ContactForm::default());

        h.scheduler.advance(4_999);
        assert_eq!(h.page.banner(), Banner::Sent);
        h.scheduler.advance(1);
        assert_eq!(h.page.banner(), Banner::Hidden);
    }

    #[test]
    fn invalid_submission_shows_every_error_and_keeps_values() {
        let h = harness();
        type_into(&h.page, Field::Name, "A");
        type_into(&h.page, Field::Email, "bad");
        type_into(&h.page, Field::Message, "short");

        h.page.dispatch(UiEvent::Submit);
        let form = h.page.form();
        assert!(Field::ALL.iter().all(|field| form.error(*field).is_some()));
        assert_eq!(form.value(Field::Name), "A");
        assert_eq!(field_error_class(&form, Field::Email), Some("error"));
        assert_eq!(h.page.banner(), Banner::Hidden);
    }

    #[test]
    fn second_success_restarts_the_hide_timer() {
        let h = harness();
        h.page.stop_typing();
        let submit_valid = || {
            type_into(&h.page, Field::Name, "Al");
            type_into(&h.page, Field::Email, "a@b.co");
            type_into(&h.page, Field::Message, "1234567890");
            h.page.dispatch(UiEvent::Submit);
        };

        submit_valid();
        h.scheduler.advance(3_000);
        submit_valid();
        h.scheduler.advance(3_000);
        assert_eq!(h.page.banner(), Banner::Sent);
        h.scheduler.advance(2_000);
        assert_eq!(h.page.banner(), Banner::Hidden);
    }

    #[test]
    fn failed_delivery_keeps_the_message() {
        let h = harness_with(MemoryStore::new(), Rc::new(RejectingSink));
        type_into(&h.page, Field::Name, "Al");
        type_into(&h.page, Field::Email, "a@b.co");
        type_into(&h.page, Field::Message, "1234567890");

        h.page.dispatch(UiEvent::Submit);
        assert_eq!(h.page.banner(), Banner::Failed);
        assert_eq!(h.page.form().value(Field::Message), "1234567890");
    }

    #[test]
    fn resume_download_is_tracked() {
        let h = harness();
        h.page.dispatch(UiEvent::Click(ClickTarget::ResumeDownload));
        assert_eq!(h.tracker.events(), vec![RESUME_DOWNLOAD]);
    }
}
