use maud::{DOCTYPE, Markup, PreEscaped, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::preferences::{Preferences, Text};

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500 \
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_SECONDARY_STYLE: &str = "w-full py-2 px-4 \
    text-sm font-medium text-gray-900 bg-white rounded border border-gray-200 \
    hover:bg-gray-100 hover:text-blue-700 focus:z-10 dark:bg-gray-800 \
    dark:text-gray-400 dark:border-gray-600 dark:hover:text-white \
    dark:hover:bg-gray-700";

pub const BUTTON_DANGER_STYLE: &str = "px-4 py-2 bg-red-600 text-white rounded \
    hover:bg-red-700 focus:outline-hidden focus:ring-2 focus:ring-red-500";

pub const LINK_BUTTON_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-300 dark:hover:text-blue-200 underline bg-transparent \
    border-none cursor-pointer";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-400 dark:hover:text-red-300 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";
pub const FORM_ERROR_STYLE: &str = "text-red-500 text-base";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs uppercase opacity-75";
pub const TABLE_ROW_STYLE: &str = "border-b border-gray-200 dark:border-gray-700";
pub const TABLE_CELL_STYLE: &str = "px-4 py-3";

/// The container for a card, styled for the theme in `preferences`.
pub fn card_style(preferences: &Preferences) -> String {
    format!(
        "p-6 rounded-xl shadow-lg border {}",
        preferences.theme.card_classes()
    )
}

pub fn base(title: &str, preferences: &Preferences, content: &Markup) -> Markup {
    let theme = preferences.theme;

    html! {
        (DOCTYPE)
        html lang=(preferences.language.html_lang()) class=[theme.is_dark().then_some("dark")]
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Shop Book" }

                script src="https://cdn.tailwindcss.com" {}
                script { (PreEscaped("tailwind.config = { darkMode: 'class' };")) }
                script src="https://unpkg.com/htmx.org@2.0.8" {}
                script src="https://unpkg.com/htmx-ext-sse@2.2.2/sse.js" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.4/response-targets.js" {}

                style
                {
                    r#"
                    #indicator.htmx-indicator {
                        display: none;
                    }

                    #indicator.htmx-request .htmx-indicator {
                        display: inline;
                    }

                    #indicator.htmx-request.htmx-indicator {
                        display: inline;
                    }
                    "#
                }
            }

            body
                hx-ext="response-targets"
                class={ "min-h-screen transition-colors duration-300 " (theme.page_classes()) }
            {
                (content)

                // Error alerts and the delete confirmation are swapped in here
                div
                    id="alert-container"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p class="mb-4 text-3xl md:text-4xl tracking-tight font-bold"
                    {
                        (description)
                    }

                    p class="mb-4 text-1xl md:text-2xl tracking-tight"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Homepage"
                    }
                }
            }
        }
    );

    base(title, &Preferences::default(), &content)
}

/// The card that holds the log-in form.
pub fn log_in_card(preferences: &Preferences, form: &Markup) -> Markup {
    html! {
        div class="min-h-screen flex items-center justify-center p-4"
        {
            div class={ "w-full max-w-md " (card_style(preferences)) }
            {
                h2 class="text-3xl font-bold text-center mb-8"
                {
                    (preferences.text(Text::LoginTitle))
                }

                (form)
            }
        }
    }
}

/// A labelled text input with an optional error message underneath.
pub fn text_input(
    name: &str,
    label: &str,
    value: &str,
    error_message: Option<&str>,
    autofocus: bool,
) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                type="text"
                name=(name)
                id=(name)
                class=(FORM_TEXT_INPUT_STYLE)
                required
                autofocus[autofocus]
                value=(value);

            @if let Some(error_message) = error_message
            {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }
        }
    }
}

pub fn password_input(label: &str, password: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="password"
                class=(FORM_LABEL_STYLE)
            {
                (label)
            }

            input
                type="password"
                name="password"
                id="password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                value=(password);

            @if let Some(error_message) = error_message
            {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }
        }

    }
}

pub fn loading_spinner() -> Markup {
    // Spinner SVG adapted from https://flowbite.com/docs/components/spinner/
    html! {
        svg
            aria-hidden="true"
            role="status"
            class="inline text-white w-4 h-4 me-2 mb-1 animate-spin"
            viewBox="0 0 100 101"
            fill="none"
            xmlns="http://www.w3.org/2000/svg"
        {
            path
                d="M100 50.5908C100 78.2051 77.6142 100.591 50 100.591C22.3858 100.591 0 78.2051 0 50.5908C0 22.9766 22.3858 0.59082 50 0.59082C77.6142 0.59082 100 22.9766 100 50.5908ZM9.08144 50.5908C9.08144 73.1895 27.4013 91.5094 50 91.5094C72.5987 91.5094 90.9186 73.1895 90.9186 50.5908C90.9186 27.9921 72.5987 9.67226 50 9.67226C27.4013 9.67226 9.08144 27.9921 9.08144 50.5908Z"
                fill="#E5E7EB" {}
            path
                d="M93.9676 39.0409C96.393 38.4038 97.8624 35.9116 97.0079 33.5539C95.2932 28.8227 92.871 24.3692 89.8167 20.348C85.8452 15.1192 80.8826 10.7238 75.2124 7.41289C69.5422 4.10194 63.2754 1.94025 56.7698 1.05124C51.7666 0.367541 46.6976 0.446843 41.7345 1.27873C39.2613 1.69328 37.813 4.19778 38.4501 6.62326C39.0873 9.04874 41.5694 10.4717 44.0505 10.1071C47.8511 9.54855 51.7191 9.52689 55.5402 10.0491C60.8642 10.7766 65.9928 12.5457 70.6331 15.2552C75.2735 17.9648 79.3347 21.5619 82.5849 25.841C84.9175 28.9121 86.7997 32.2913 88.1811 35.8758C89.083 38.2158 91.5421 39.6781 93.9676 39.0409Z"
                fill="currentColor" {}
        }
    }
}

/// numfmt switches to scientific notation at twelve integer digits.
const SCIENTIFIC_NOTATION_CUTOFF: f64 = 1_000_000_000_000.0;

/// Format `number` as rupees rounded to two decimal places, e.g. "₹1,234.50".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("₹")
            .expect("the rupee sign is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-₹")
            .expect("the rupee sign is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    // Sums of paise carry float noise, e.g. 10.1 + 20.2 - 30.3 is -3.55e-15.
    let number = (number * 100.0).round() / 100.0;

    if number == 0.0 {
        // Zero is hardcoded as "0" and -0.0 would keep its sign.
        return "₹0.00".to_owned();
    }

    if number.abs() >= SCIENTIFIC_NOTATION_CUTOFF {
        return format_large_currency(number);
    }

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else {
        positive_fmt.fmt_string(number)
    };

    // numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3" and
    // "50.00" as "50".
    let decimal_places = formatted_string
        .split_once('.')
        .map(|(_, decimals)| decimals.len());

    match decimal_places {
        None => formatted_string.push_str(".00"),
        Some(1) => formatted_string.push('0'),
        Some(_) => {}
    }

    formatted_string
}

/// Group the digits of amounts numfmt would print as "₹1.0e15".
fn format_large_currency(number: f64) -> String {
    let sign = if number < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", number.abs());
    let (whole, decimals) = fixed.split_once('.').unwrap_or((&fixed, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}₹{grouped}.{decimals}")
}
