use crate::models::{BloodRequestForm, DashboardStats, Donor, DonorForm, HomeSummary, SearchQuery};
use crate::routes::flash::Flash;
use crate::views::{blood_group_options, escape, layout};

pub fn home_page(summary: &HomeSummary, flashes: &[Flash]) -> String {
    let body = format!(
        r#"<h1>Give blood. Save lives.</h1>
<section class="stats">
<p><strong id="total-donors">{}</strong> registered donors</p>
<p><strong id="lives-saved">{}</strong> lives saved</p>
<p><strong id="cities-served">{}</strong> cities served</p>
</section>
<p><a href="/donor/register">Register as a donor</a> or <a href="/request">request blood</a>.</p>"#,
        summary.total_donors, summary.lives_saved, summary.cities_served
    );

    layout("Home", flashes, &body)
}

fn text_input(name: &str, label: &str, value: &str, kind: &str, required: bool) -> String {
    format!(
        r#"<label>{label} <input type="{kind}" name="{name}" value="{value}"{required}></label>"#,
        label = escape(label),
        kind = kind,
        name = name,
        value = escape(value),
        required = if required { " required" } else { "" },
    )
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|message| format!(r#"<div class="flash flash-danger">{}</div>"#, escape(message)))
        .unwrap_or_default()
}

pub fn donor_register_page(form: &DonorForm, error: Option<&str>, flashes: &[Flash]) -> String {
    let checked = if form.available.as_deref() == Some("on") || error.is_none() {
        " checked"
    } else {
        ""
    };

    let body = format!(
        r#"<h1>Become a donor</h1>
{error}
<form method="post" action="/donor/register">
{full_name}
{email}
{phone}
<label>Blood group <select name="blood_group" required>{groups}</select></label>
{dob}
{city}
{state}
<label><input type="checkbox" name="available"{checked}> Available to donate</label>
{last_donation}
<button type="submit">Register</button>
</form>"#,
        error = error_banner(error),
        full_name = text_input("full_name", "Full name", &form.full_name, "text", true),
        email = text_input("email", "Email", &form.email, "email", true),
        phone = text_input("phone", "Phone", &form.phone, "tel", true),
        groups = blood_group_options(&form.blood_group, false),
        dob = text_input("date_of_birth", "Date of birth", &form.date_of_birth, "date", false),
        city = text_input("city", "City", &form.city, "text", true),
        state = text_input("state", "State / region", &form.state, "text", false),
        checked = checked,
        last_donation = text_input(
            "last_donation_date",
            "Last donation",
            &form.last_donation_date,
            "date",
            false
        ),
    );

    layout("Register as a donor", flashes, &body)
}

pub fn request_page(form: &BloodRequestForm, error: Option<&str>, flashes: &[Flash]) -> String {
    let body = format!(
        r#"<h1>Request blood</h1>
{error}
<form method="post" action="/request">
{patient}
{contact}
{email}
{phone}
<label>Blood group needed <select name="blood_group_needed" required>{groups}</select></label>
<label>Units required <input type="number" name="units_required" min="1" value="{units}" required></label>
{hospital}
{city}
<button type="submit">Submit request</button>
</form>"#,
        error = error_banner(error),
        patient = text_input("patient_name", "Patient name", &form.patient_name, "text", true),
        contact = text_input("contact_person", "Contact person", &form.contact_person, "text", true),
        email = text_input("email", "Email", &form.email, "email", false),
        phone = text_input("phone", "Phone", &form.phone, "tel", true),
        groups = blood_group_options(&form.blood_group_needed, false),
        units = escape(&form.units_required),
        hospital = text_input("hospital_name", "Hospital", &form.hospital_name, "text", true),
        city = text_input("city", "City", &form.city, "text", true),
    );

    layout("Request blood", flashes, &body)
}

pub fn find_donors_page(
    donors: &[Donor],
    query: &SearchQuery,
    error: Option<&str>,
    flashes: &[Flash],
) -> String {
    let rows: String = donors
        .iter()
        .map(|donor| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&donor.full_name),
                donor.blood_group,
                escape(&donor.city),
                escape(donor.region.as_deref().unwrap_or("")),
                escape(&donor.phone),
                escape(&donor.email),
            )
        })
        .collect();

    let results = if donors.is_empty() {
        r#"<p class="empty">No eligible donors found.</p>"#.to_string()
    } else {
        format!(
            r#"<table>
<thead><tr><th>Name</th><th>Blood group</th><th>City</th><th>Region</th><th>Phone</th><th>Email</th></tr></thead>
<tbody>
{}</tbody>
</table>"#,
            rows
        )
    };

    let body = format!(
        r#"<h1>Find donors</h1>
{error}
<form method="get" action="/donors">
<label>Blood group <select name="blood_group">{groups}</select></label>
<label>City <input type="text" name="city" value="{city}"></label>
<button type="submit">Search</button>
</form>
<p><span id="result-count">{count}</span> eligible donors</p>
{results}"#,
        error = error_banner(error),
        groups = blood_group_options(&query.blood_group, true),
        city = escape(&query.city),
        count = donors.len(),
        results = results,
    );

    layout("Find donors", flashes, &body)
}

pub fn dashboard_page(stats: &DashboardStats, flashes: &[Flash]) -> String {
    let rows: String = stats
        .availability
        .iter()
        .map(|entry| {
            format!(
                "<tr><td><a href=\"/donors?blood_group={link}\">{group}</a></td><td>{total}</td><td>{eligible}</td></tr>\n",
                link = urlencoding::encode(entry.blood_group.as_str()),
                group = entry.blood_group,
                total = entry.total,
                eligible = entry.eligible,
            )
        })
        .collect();

    let body = format!(
        r#"<h1>Dashboard</h1>
<section class="stats">
<p><strong id="total-donors">{}</strong> donors</p>
<p><strong id="eligible-donors">{}</strong> eligible now</p>
<p><strong id="total-requests">{}</strong> requests</p>
</section>
<table>
<thead><tr><th>Blood group</th><th>Available</th><th>Eligible</th></tr></thead>
<tbody>
{}</tbody>
</table>"#,
        stats.total_donors, stats.eligible_donors, stats.total_requests, rows
    );

    layout("Dashboard", flashes, &body)
}

/// Minimal page for errors raised outside a form flow
pub fn error_page(title: &str, message: &str) -> String {
    let body = format!("<h1>{}</h1>\n<p>{}</p>", escape(title), escape(message));
    layout(title, &[], &body)
}
