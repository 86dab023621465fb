//! Server-rendered pages.
//!
//! The booking-flow pages only echo the id they were routed with.

use std::borrow::Cow;
use std::fmt::Write;

use crate::models::Class;

pub const BRAND: &str = "Black Swan Yoga";

pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | {BRAND}</title>
</head>
<body>
<header>
<a href="/" class="brand">{BRAND}</a>
<nav>
<a href="/">Find a Class</a>
<a href="/dashboard">Dashboard</a>
</nav>
</header>
<main>
<h1>{title}</h1>
{content}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn placeholder(title: &str, label: &str, id: &str) -> String {
    layout(title, &format!("<p>{label}: {}</p>", escape(id)))
}

pub fn loading_page() -> String {
    layout("Find a Class", "<p>Loading...</p>")
}

pub fn error_page(message: &str) -> String {
    layout(
        "Find a Class",
        &format!(r#"<p class="error">Error: {}</p>"#, escape(message)),
    )
}

pub fn class_list_page(classes: &[&Class]) -> String {
    let mut content = String::from(r#"<div class="classes">"#);
    content.push('\n');
    for class in classes {
        let _ = writeln!(
            content,
            r#"<article class="class" data-class-id="{id}">
<h2><a href="/class/{id}">{name}</a></h2>
<p class="teacher">{teacher}</p>
<p class="studio">{studio}</p>
<p class="time">{time}</p>
</article>"#,
            id = escape(&class.id),
            name = escape(&class.name),
            teacher = escape(&class.teacher.name),
            studio = escape(&class.studio.name),
            time = class.start_time.format("%-I:%M:%S %p"),
        );
    }
    content.push_str("</div>");
    layout("Find a Class", &content)
}

pub fn class_details_page(class_id: &str) -> String {
    placeholder("Class Details", "Class ID", class_id)
}

pub fn donation_page(class_id: &str) -> String {
    placeholder("Select Donation", "Class ID", class_id)
}

pub fn waiver_page(class_id: &str) -> String {
    placeholder("Sign Waiver", "Class ID", class_id)
}

pub fn payment_page(class_id: &str) -> String {
    placeholder("Payment", "Class ID", class_id)
}

pub fn confirmation_page(booking_id: &str) -> String {
    placeholder("Booking Confirmed", "Booking ID", booking_id)
}

pub fn dashboard_page() -> String {
    layout(
        "Dashboard",
        r#"<section>
<h2>Upcoming Classes</h2>
<p>No upcoming classes</p>
</section>
<section>
<h2>Past Classes</h2>
<p>No past classes</p>
</section>"#,
    )
}
