use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuInput {
    Toggle,
    Close,
    LinkActivated,
    Escape,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusTarget {
    First,
    Last,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FocusPosition {
    pub at_first: bool,
    pub at_last: bool,
}

#[derive(Clone, Debug, Default)]
pub struct NavMenu {
    state: MenuState,
}

impl NavMenu {
    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == MenuState::Open
    }

    pub fn handle(&mut self, input: MenuInput) -> bool {
        let next = match (self.state, input) {
            (_, MenuInput::Toggle) => MenuState::Open,
            (MenuState::Open, MenuInput::Close | MenuInput::LinkActivated | MenuInput::Escape) => {
                MenuState::Closed
            }
            (MenuState::Closed, _) => MenuState::Closed,
        };

        let changed = next != self.state;
        if changed {
            debug!(?input, ?next, "nav menu transition");
        }
        self.state = next;
        changed
    }

    pub fn trap_focus(&self, position: FocusPosition, shift: bool) -> Option<FocusTarget> {
        if !self.is_open() {
            return None;
        }

        match (shift, position.at_first, position.at_last) {
            (true, true, _) => Some(FocusTarget::Last),
            (false, _, true) => Some(FocusTarget::First),
            _ => None,
        }
    }
}
