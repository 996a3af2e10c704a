//! State of the create/edit form.

use crate::model::{NewUser, Role, RoleSet, User, UserId, digits_only};
use crate::validate::{Field, FieldErrors, validate};

/// Whether the form creates a new record or edits an existing one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(UserId),
}

/// Focusable form rows, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Firstname,
    Name,
    Position,
    Telephone,
    Email,
    Role,
    Status,
    Published,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Firstname => "First name",
            FormField::Name => "Name",
            FormField::Position => "Position",
            FormField::Telephone => "Telephone",
            FormField::Email => "Email",
            FormField::Role => "Role",
            FormField::Status => "Status",
            FormField::Published => "Published",
        }
    }

    /// The validated field behind this row, if any.
    pub fn validated(self) -> Option<Field> {
        match self {
            FormField::Firstname => Some(Field::Firstname),
            FormField::Name => Some(Field::Name),
            FormField::Position => Some(Field::Position),
            FormField::Telephone => Some(Field::Telephone),
            FormField::Email => Some(Field::Email),
            FormField::Role => Some(Field::Role),
            FormField::Status => Some(Field::Status),
            FormField::Published => None,
        }
    }

    pub fn is_text(self) -> bool {
        matches!(
            self,
            FormField::Firstname | FormField::Name | FormField::Telephone | FormField::Email
        )
    }
}

/// What a valid submission should send.
#[derive(Clone, Debug, PartialEq)]
pub enum Submission {
    Create(NewUser),
    Update(UserId, User),
}

#[derive(Clone, Debug)]
pub struct FormState {
    pub mode: FormMode,
    pub user: User,
    pub roles: RoleSet,
    pub errors: FieldErrors,
    pub focus: FormField,
    pub role_cursor: usize,
    /// Edit form waiting for `fetch_one`.
    pub loading: bool,
    /// A create/update request is in flight.
    pub submitting: bool,
}

impl FormState {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            user: User::blank(),
            roles: RoleSet::new(),
            errors: FieldErrors::default(),
            focus: FormField::Firstname,
            role_cursor: 0,
            loading: false,
            submitting: false,
        }
    }

    pub fn edit(id: UserId) -> Self {
        let user = User {
            id: Some(id.clone()),
            published: None,
            ..User::blank()
        };
        Self {
            mode: FormMode::Edit(id),
            user,
            loading: true,
            ..Self::create()
        }
    }

    pub fn title(&self) -> String {
        match &self.mode {
            FormMode::Create => "Add User".to_string(),
            FormMode::Edit(id) => format!("User {id}"),
        }
    }

    pub fn editing(&self) -> Option<&UserId> {
        match &self.mode {
            FormMode::Edit(id) => Some(id),
            FormMode::Create => None,
        }
    }

    /// Fill the form from a fetched record. `published` is a creation-only flag and is dropped.
    pub fn hydrate(&mut self, user: User) {
        self.roles = user.roles();
        self.user = User {
            published: None,
            ..user
        };
        self.loading = false;
    }

    /// Rows shown for the current mode.
    pub fn fields(&self) -> &'static [FormField] {
        const EDIT: [FormField; 7] = [
            FormField::Firstname,
            FormField::Name,
            FormField::Position,
            FormField::Telephone,
            FormField::Email,
            FormField::Role,
            FormField::Status,
        ];
        const CREATE: [FormField; 8] = [
            FormField::Firstname,
            FormField::Name,
            FormField::Position,
            FormField::Telephone,
            FormField::Email,
            FormField::Role,
            FormField::Status,
            FormField::Published,
        ];
        match self.mode {
            FormMode::Create => &CREATE,
            FormMode::Edit(_) => &EDIT,
        }
    }

    pub fn focus_next(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + 1) % fields.len()];
    }

    pub fn focus_prev(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + fields.len() - 1) % fields.len()];
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Firstname => Some(&mut self.user.firstname),
            FormField::Name => Some(&mut self.user.name),
            FormField::Telephone => Some(&mut self.user.telephone),
            FormField::Email => Some(&mut self.user.email),
            _ => None,
        }
    }

    /// Append typed or pasted text to the focused text field. Telephone keeps digits only.
    pub fn input_str(&mut self, text: &str) {
        let focus = self.focus;
        let text = if focus == FormField::Telephone {
            digits_only(text)
        } else {
            text.replace(['\n', '\r'], "")
        };
        if let Some(value) = self.text_mut(focus) {
            value.push_str(&text);
        }
    }

    pub fn input_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.input_str(c.encode_utf8(&mut buf));
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        if let Some(value) = self.text_mut(focus) {
            value.pop();
        }
    }

    /// Left/Right on select rows cycles the value; on the role row it moves the cursor.
    pub fn cycle(&mut self, forward: bool) {
        match self.focus {
            FormField::Position => {
                self.user.position = if forward {
                    self.user.position.next()
                } else {
                    self.user.position.prev()
                };
            }
            FormField::Status => {
                self.user.status = if forward {
                    self.user.status.next()
                } else {
                    self.user.status.prev()
                };
            }
            FormField::Role => {
                let n = Role::ALL.len();
                self.role_cursor = if forward {
                    (self.role_cursor + 1) % n
                } else {
                    (self.role_cursor + n - 1) % n
                };
            }
            FormField::Published => self.toggle(),
            _ => {}
        }
    }

    /// Space on the role row toggles the role under the cursor; on Published flips it.
    pub fn toggle(&mut self) {
        match self.focus {
            FormField::Role => {
                if let Some(role) = Role::ALL.get(self.role_cursor).copied() {
                    self.toggle_role(role);
                }
            }
            FormField::Published => {
                let current = self.user.published.unwrap_or(false);
                self.user.published = Some(!current);
            }
            _ => {}
        }
    }

    pub fn toggle_role(&mut self, role: Role) {
        self.roles.toggle(role);
        self.user.role = self.roles.encode();
    }

    /// Run validation, store the errors, and return what to send when valid.
    pub fn submit(&mut self) -> Option<Submission> {
        self.errors = validate(&self.user);
        if !self.errors.is_empty() {
            return None;
        }
        match &self.mode {
            FormMode::Create => Some(Submission::Create(NewUser::from(&self.user))),
            FormMode::Edit(id) => Some(Submission::Update(id.clone(), self.user.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Position, Status};
    use crate::validate::REQUIRED;

    fn fill(form: &mut FormState) {
        form.user.firstname = "Ada".into();
        form.user.name = "Lovelace".into();
        form.user.telephone = "555".into();
        form.user.email = "ada@example.com".into();
        form.user.status = Status::Active;
        form.user.position = Position::Auditor;
        form.toggle_role(Role::Support);
    }

    #[test]
    fn telephone_input_keeps_digits_only() {
        let mut form = FormState::create();
        form.focus = FormField::Telephone;
        for c in "+1 (555) x12".chars() {
            form.input_char(c);
        }
        form.input_str("-34");
        assert_eq!(form.user.telephone, "15551234");
    }

    #[test]
    fn text_input_and_backspace() {
        let mut form = FormState::create();
        form.input_str("Ada\n");
        form.input_char('m');
        form.backspace();
        assert_eq!(form.user.firstname, "Ada");
    }

    #[test]
    fn role_toggle_reencodes_role_string() {
        let mut form = FormState::create();
        form.focus = FormField::Role;
        form.cycle(false); // wraps to Assistant
        form.toggle();
        form.role_cursor = 0;
        form.toggle();
        assert_eq!(form.user.role, "Assistant,Administrator");
        form.toggle();
        assert_eq!(form.user.role, "Assistant");
    }

    #[test]
    fn blank_submit_is_rejected_with_required_errors() {
        let mut form = FormState::create();
        assert!(form.submit().is_none());
        assert_eq!(form.errors.get(Field::Status), Some(REQUIRED));
        assert_eq!(form.errors.len(), 7);
    }

    #[test]
    fn valid_create_submits_new_user_with_published() {
        let mut form = FormState::create();
        fill(&mut form);
        form.focus = FormField::Published;
        form.toggle();
        match form.submit() {
            Some(Submission::Create(new)) => {
                assert_eq!(new.role, "Support");
                assert_eq!(new.published, Some(true));
            }
            other => panic!("unexpected submission {other:?}"),
        }
    }

    #[test]
    fn edit_hydrates_roles_and_drops_published() {
        let mut form = FormState::edit(UserId::Number(4));
        assert!(form.loading);
        let mut fetched = User::blank();
        fetched.id = Some(UserId::Number(4));
        fetched.role = "Administrator,Assistant".into();
        fetched.published = Some(true);
        form.hydrate(fetched);
        assert!(!form.loading);
        assert!(form.roles.contains(Role::Assistant));
        assert_eq!(form.user.published, None);
        assert!(!form.fields().contains(&FormField::Published));
    }

    #[test]
    fn valid_edit_submits_update_for_same_id() {
        let mut form = FormState::edit(UserId::Number(9));
        form.loading = false;
        fill(&mut form);
        assert_eq!(
            form.submit().map(|s| matches!(s, Submission::Update(UserId::Number(9), _))),
            Some(true)
        );
    }

    #[test]
    fn focus_wraps_around() {
        let mut form = FormState::edit(UserId::Number(1));
        form.focus_prev();
        assert_eq!(form.focus, FormField::Status);
        form.focus_next();
        assert_eq!(form.focus, FormField::Firstname);
    }
}
