//! The strings shown in the UI, in every supported language.

use crate::preferences::Language;

/// A piece of UI text.
///
/// Use [Language::text] to get the string for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    LoginTitle,
    Username,
    Password,
    LoginButton,
    LoginSuccess,
    LoginFailed,
    RememberMe,
    InternalError,
    DashboardTitle,
    Dashboard,
    AddEntry,
    EditEntry,
    Description,
    Amount,
    Type,
    Income,
    Expense,
    Date,
    Add,
    Update,
    Cancel,
    Edit,
    Delete,
    ConfirmDelete,
    TotalIncome,
    TotalExpense,
    NetBalance,
    NoEntries,
    UserId,
    Loading,
    Settings,
    SelectTheme,
    SelectLanguage,
    ThemeLight,
    ThemeDark,
    ThemeBlue,
    Save,
    Logout,
    EmptyDescription,
    InvalidAmount,
    NonPositiveAmount,
    Error,
}

impl Text {
    /// The English and Hinglish versions of the text.
    fn translations(self) -> (&'static str, &'static str) {
        match self {
            Text::LoginTitle => ("Shop Book Login", "Dukaan Hisab Login"),
            Text::Username => ("Username", "Username"),
            Text::Password => ("Password", "Password"),
            Text::LoginButton => ("Login", "Login Karein"),
            Text::LoginSuccess => ("Login Successful!", "Login Safal Hua!"),
            Text::LoginFailed => (
                "Invalid Username or Password.",
                "Galat Username Ya Password.",
            ),
            Text::RememberMe => (
                "Keep me logged in for one week",
                "Ek hafte tak login rakhein",
            ),
            Text::InternalError => (
                "Something went wrong. Please try again later.",
                "Kuch galat ho gaya. Kripya baad mein koshish karein.",
            ),
            Text::DashboardTitle => ("My Shop Book", "Meri Dukaan Ki Hisab Kitaab"),
            Text::Dashboard => ("Dashboard", "Dashboard"),
            Text::AddEntry => ("Add New Entry", "Nayi Entry Daalein"),
            Text::EditEntry => ("Edit Entry", "Entry Edit Karein"),
            Text::Description => ("Description", "Vivaran"),
            Text::Amount => ("Amount", "Rashi"),
            Text::Type => ("Type", "Prakar"),
            Text::Income => ("Income", "Aamdani"),
            Text::Expense => ("Expense", "Kharcha"),
            Text::Date => ("Date", "Tareekh"),
            Text::Add => ("Add", "Jodein"),
            Text::Update => ("Update", "Update Karein"),
            Text::Cancel => ("Cancel", "Cancel Karein"),
            Text::Edit => ("Edit", "Edit Karein"),
            Text::Delete => ("Delete", "Delete Karein"),
            Text::ConfirmDelete => (
                "Are you sure you want to delete this entry?",
                "Kya aap is entry ko delete karna chahte hain?",
            ),
            Text::TotalIncome => ("Total Income", "Kul Aamdani"),
            Text::TotalExpense => ("Total Expense", "Kul Kharcha"),
            Text::NetBalance => ("Net Balance", "Shuddh Balance"),
            Text::NoEntries => (
                "No entries yet. Add some to get started!",
                "Abhi tak koi entry nahi hai. Shuru karne ke liye kuch jodein!",
            ),
            Text::UserId => ("Your User ID:", "Aapka User ID:"),
            Text::Loading => ("Loading...", "Load ho raha hai..."),
            Text::Settings => ("Settings", "Settings"),
            Text::SelectTheme => ("Select Theme", "Theme Chunein"),
            Text::SelectLanguage => ("Select Language", "Bhasha Chunein"),
            Text::ThemeLight => ("Light", "Light"),
            Text::ThemeDark => ("Dark", "Dark"),
            Text::ThemeBlue => ("Blue", "Neela"),
            Text::Save => ("Save", "Save Karein"),
            Text::Logout => ("Logout", "Logout Karein"),
            Text::EmptyDescription => (
                "Please enter a description.",
                "Kripya vivaran daalein.",
            ),
            Text::InvalidAmount => (
                "Please enter a valid amount.",
                "Kripya sahi rashi daalein.",
            ),
            Text::NonPositiveAmount => (
                "The amount must be greater than zero.",
                "Rashi zero se zyada honi chahiye.",
            ),
            Text::Error => ("Error", "Galti"),
        }
    }
}

impl Language {
    /// The UI text for `key` in this language.
    pub fn text(self, key: Text) -> &'static str {
        let (english, hinglish) = key.translations();

        match self {
            Language::English => english,
            Language::Hinglish => hinglish,
        }
    }
}
