//! Plain-text rendering of view models.
//!
//! Every function writes to an `io::Write` so tests can capture output.

use std::io::{self, Write};

use crate::domain::{
    BoardView, DashboardView, DerivedVacancy, Destination, MyApplicationsView, Notice, ProfileCard,
    Role, menu_for,
};

/// Write a single notice line.
pub fn notice(out: &mut impl Write, notice: &Notice) -> io::Result<()> {
    writeln!(out, "{notice}")
}

/// Write the profile card, or a sign-in hint when nobody is signed in.
pub fn profile(out: &mut impl Write, card: Option<&ProfileCard>) -> io::Result<()> {
    let Some(card) = card else {
        return writeln!(out, "Not signed in. Set JOBBOARD_EMAIL and JOBBOARD_PASSWORD.");
    };
    if card.initials.is_empty() {
        writeln!(out, "{}", card.heading)?;
    } else {
        writeln!(out, "({}) {}", card.initials, card.heading)?;
    }
    writeln!(out, "  email:        {}", card.email)?;
    writeln!(out, "  role:         {}", role_label(card.role))?;
    writeln!(out, "  member since: {}", card.member_since)
}

/// Human label for a role.
pub const fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "Administrator",
        Role::Poster => "Poster",
        Role::Applicant => "Applicant",
    }
}

/// Write the navigation menu for `role`.
pub fn menu(out: &mut impl Write, role: Option<Role>) -> io::Result<()> {
    let entries = menu_for(role);
    if entries.is_empty() {
        let login = Destination::Login;
        return writeln!(out, "{}: jobboard {}", login.label(), login.command());
    }
    for entry in entries {
        writeln!(out, "{:<16} jobboard {}", entry.label(), entry.command())?;
    }
    Ok(())
}

fn vacancy(out: &mut impl Write, derived: &DerivedVacancy) -> io::Result<()> {
    let DerivedVacancy { vacancy, state } = derived;
    write!(out, "[{}] {}", state.badge, vacancy.title)?;
    if !vacancy.company.is_empty() {
        write!(out, " at {}", vacancy.company)?;
    }
    writeln!(out)?;

    let mut details = vec![format!("id {}", vacancy.id)];
    if !vacancy.location.is_empty() {
        details.push(vacancy.location.clone());
    }
    if let Some(modality) = vacancy.modality {
        details.push(modality.label().to_owned());
    }
    details.push(format!("salary {}", vacancy.compensation));
    if state.capacity.is_bounded() {
        details.push(state.capacity.to_string());
    }
    writeln!(out, "    {}", details.join(" | "))?;

    let marker = if state.action.is_enabled() { ">" } else { "x" };
    writeln!(out, "    {marker} {}", state.action)
}

/// Write the vacancy board.
pub fn board(out: &mut impl Write, view: &BoardView) -> io::Result<()> {
    if let Some(text) = &view.search {
        writeln!(out, "Search: {text}")?;
    }
    if let Some(quota) = view.quota() {
        writeln!(out, "Active applications: {quota}")?;
    }
    if let Some(notice) = &view.notice {
        self::notice(out, notice)?;
    }
    if view.vacancies.is_empty() {
        return writeln!(out, "No vacancies found.");
    }
    for derived in &view.vacancies {
        vacancy(out, derived)?;
    }
    Ok(())
}

/// Write the applicant's applications.
pub fn applications(out: &mut impl Write, view: &MyApplicationsView) -> io::Result<()> {
    writeln!(out, "Active applications: {}", view.quota)?;
    if let Some(notice) = &view.notice {
        self::notice(out, notice)?;
    }
    if view.rows.is_empty() {
        return writeln!(out, "You have not applied to any vacancy yet.");
    }
    for row in &view.rows {
        writeln!(
            out,
            "{:<9} {} at {} (applied {})",
            row.status.label(),
            row.vacancy_title,
            row.company,
            row.applied_on
        )?;
    }
    Ok(())
}

/// Write the administration dashboard.
pub fn dashboard(out: &mut impl Write, view: &DashboardView) -> io::Result<()> {
    if let Some(notice) = &view.notice {
        self::notice(out, notice)?;
    }
    let stats = view.stats;
    writeln!(
        out,
        "Vacancies: {} ({} active) | Applications: {} ({} pending)",
        stats.total_vacancies,
        stats.active_vacancies,
        stats.total_applications,
        stats.pending_applications
    )?;
    for vacancy in &view.vacancies {
        let status = if vacancy.is_active { "open" } else { "closed" };
        writeln!(
            out,
            "  {} {} [{status}] {}/{}",
            vacancy.id, vacancy.title, vacancy.current_applicants, vacancy.max_applicants
        )?;
    }
    if view.queue.is_empty() {
        return Ok(());
    }
    writeln!(out, "Review queue:")?;
    for entry in &view.queue {
        let applicant = entry
            .application
            .applicant
            .as_ref()
            .and_then(|a| a.name.clone().or_else(|| a.email.clone()))
            .unwrap_or_else(|| "Applicant".to_owned());
        writeln!(
            out,
            "  {} {applicant} -> {} ({}) [{}]",
            entry.application.id,
            entry.vacancy_title,
            entry.company,
            entry.application.status.label()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{
        ActiveQuota, Application, ApplicationRow, ApplicationStatus, Compensation, DashboardStats,
        Identity, IdentityId, Vacancy, VacancyId, Viewer, derive_all,
    };

    fn text(render: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buffer = Vec::new();
        render(&mut buffer).expect("render to memory");
        String::from_utf8(buffer).expect("utf-8 output")
    }

    fn board_for(viewer: Viewer, vacancies: Vec<Vacancy>) -> BoardView {
        BoardView {
            search: None,
            vacancies: derive_all(vacancies, &viewer),
            viewer,
            notice: None,
        }
    }

    #[test]
    fn board_lists_badge_details_and_action() {
        let vacancy = Vacancy::new(VacancyId::new("v-1").expect("id"), "Rust Engineer")
            .with_company("Ferris Ltd")
            .with_capacity(5, 2)
            .with_compensation(Compensation::Amount(3500.0));
        let view = board_for(Viewer::new(Some(Role::Applicant), Vec::new()), vec![vacancy]);
        let output = text(|out| board(out, &view));
        assert_eq!(
            output,
            "Active applications: 0/3\n\
             [Active] Rust Engineer at Ferris Ltd\n    \
             id v-1 | salary $3,500 | 2/5 applicants (3 spots left)\n    \
             > Apply\n"
        );
    }

    #[test]
    fn anonymous_board_has_no_quota_and_asks_to_sign_in() {
        let vacancy = Vacancy::new(VacancyId::new("v-1").expect("id"), "SRE");
        let output = text(|out| board(out, &board_for(Viewer::anonymous(), vec![vacancy])));
        assert!(!output.contains("Active applications"));
        assert!(output.contains("x Sign in to apply"));
        assert!(output.contains("salary —"));
    }

    #[test]
    fn empty_board_says_so() {
        let output = text(|out| board(out, &board_for(Viewer::anonymous(), Vec::new())));
        assert_eq!(output, "No vacancies found.\n");
    }

    #[test]
    fn signed_out_menu_points_at_sign_in() {
        assert_eq!(text(|out| menu(out, None)), "Sign in: jobboard profile\n");
    }

    #[test]
    fn applicant_menu_lists_applications() {
        let output = text(|out| menu(out, Some(Role::Applicant)));
        assert!(output.contains("My applications"));
        assert!(!output.contains("Administration"));
    }

    #[test]
    fn profile_shows_initials_and_role() {
        let identity = Identity::new(
            IdentityId::new("u-1").expect("id"),
            "ada@example.com",
            Role::Poster,
        )
        .with_display_name("Ada Lovelace");
        let card = ProfileCard::from_identity(&identity);
        let output = text(|out| profile(out, Some(&card)));
        assert!(output.starts_with("(AL) Ada Lovelace\n"));
        assert!(output.contains("role:         Poster"));
        assert!(output.contains("member since: Unknown date"));
    }

    #[test]
    fn applications_list_rows_with_quota() {
        let view = MyApplicationsView {
            rows: vec![ApplicationRow {
                vacancy_title: "Rust Engineer".to_owned(),
                company: "Ferris Ltd".to_owned(),
                status: ApplicationStatus::Pending,
                applied_on: "2 May 2024".to_owned(),
            }],
            quota: ActiveQuota { active: 1 },
            notice: None,
        };
        assert_eq!(
            text(|out| applications(out, &view)),
            "Active applications: 1/3\n\
             Pending   Rust Engineer at Ferris Ltd (applied 2 May 2024)\n"
        );
    }

    #[test]
    fn dashboard_shows_stats_and_queue() {
        let application = Application::new(
            crate::domain::ApplicationId::new("a-1").expect("id"),
            VacancyId::new("v-1").expect("id"),
            ApplicationStatus::Pending,
        );
        let vacancy = Vacancy::new(VacancyId::new("v-1").expect("id"), "Rust Engineer")
            .with_company("Ferris Ltd")
            .with_capacity(5, 0)
            .with_applications(vec![application.clone()]);
        let view = DashboardView {
            stats: DashboardStats::of(std::slice::from_ref(&vacancy)),
            queue: vec![crate::domain::ReviewEntry {
                application,
                vacancy_title: "Rust Engineer".to_owned(),
                company: "Ferris Ltd".to_owned(),
            }],
            vacancies: vec![vacancy],
            notice: None,
        };
        let output = text(|out| dashboard(out, &view));
        assert!(output.starts_with("Vacancies: 1 (1 active) | Applications: 1 (1 pending)\n"));
        assert!(output.contains("  v-1 Rust Engineer [open] 1/5\n"));
        assert!(output.contains("  a-1 Applicant -> Rust Engineer (Ferris Ltd) [Pending]\n"));
    }
}
