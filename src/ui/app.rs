use crate::aggregate::Summary;
use crate::models::{Transaction, TransactionFilter};
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Transactions]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Transactions"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Adding,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Adding => write!(f, "ADD"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Amount,
    Category,
    Description,
    Recurring,
}

impl FormField {
    const ORDER: [FormField; 4] = [
        Self::Amount,
        Self::Category,
        Self::Description,
        Self::Recurring,
    ];

    pub(crate) fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub(crate) fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Quick-add form state. Text fields hold raw input; the store validates on save.
#[derive(Debug, Clone)]
pub(crate) struct QuickAddForm {
    pub(crate) amount: String,
    pub(crate) category: String,
    pub(crate) description: String,
    pub(crate) recurring: bool,
    pub(crate) field: FormField,
}

impl Default for QuickAddForm {
    fn default() -> Self {
        Self {
            amount: String::new(),
            category: String::new(),
            description: String::new(),
            recurring: false,
            field: FormField::Amount,
        }
    }
}

impl QuickAddForm {
    /// Text buffer for the focused field, if it is a text field.
    pub(crate) fn focused_text(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Amount => Some(&mut self.amount),
            FormField::Category => Some(&mut self.category),
            FormField::Description => Some(&mut self.description),
            FormField::Recurring => None,
        }
    }

    /// Step the category field through the known categories.
    pub(crate) fn cycle_category(&mut self, categories: &[String], forward: bool) {
        if categories.is_empty() {
            return;
        }
        let next = match categories.iter().position(|c| *c == self.category) {
            Some(i) if forward => (i + 1) % categories.len(),
            Some(i) => (i + categories.len() - 1) % categories.len(),
            None if forward => 0,
            None => categories.len() - 1,
        };
        self.category = categories[next].clone();
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) filter: TransactionFilter,

    // Dashboard
    pub(crate) summary: Summary,

    // Transactions
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,
    pub(crate) transaction_count: usize,

    pub(crate) categories: Vec<String>,
    pub(crate) form: QuickAddForm,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            filter: TransactionFilter::default(),

            summary: Summary::of(&[]),

            transactions: Vec::new(),
            transaction_index: 0,
            transaction_scroll: 0,
            transaction_count: 0,

            categories: Vec::new(),
            form: QuickAddForm::default(),

            visible_rows: 20,
        }
    }

    /// Recompute every view from the store. The dashboard always covers all
    /// transactions; the table honours the active filter.
    pub(crate) fn refresh(&mut self, store: &Store) {
        let all: Vec<&Transaction> = store.transactions().iter().collect();
        self.summary = Summary::of(&all);
        self.transaction_count = all.len();
        self.categories = store.list_categories().to_vec();

        self.transactions = store
            .list_transactions(&self.filter)
            .into_iter()
            .cloned()
            .collect();
        if self.transaction_index >= self.transactions.len() {
            self.transaction_index = self.transactions.len().saturating_sub(1);
        }
        if self.transaction_scroll > self.transaction_index {
            self.transaction_scroll = self.transaction_index;
        }
    }

    pub(crate) fn open_form(&mut self) {
        self.form = QuickAddForm::default();
        self.input_mode = InputMode::Adding;
    }

    pub(crate) fn close_form(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Save the form through the store. Errors stay in the status bar and
    /// leave the form open for correction. Returns whether the save succeeded.
    pub(crate) fn submit_form(&mut self, store: &mut Store) -> bool {
        let result = store.add_transaction(
            &self.form.amount,
            &self.form.category,
            &self.form.description,
            self.form.recurring,
        );
        match result {
            Ok(txn) => {
                self.set_status(format!(
                    "Saved: {} {}",
                    txn.category,
                    crate::ui::util::format_amount(txn.amount)
                ));
                self.close_form();
                self.refresh(store);
                true
            }
            Err(e) => {
                if e.is_validation() {
                    self.set_status(format!("Invalid input: {e}"));
                } else {
                    self.set_status(format!("Could not save: {e}"));
                }
                false
            }
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
