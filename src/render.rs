use crate::{
    config::{Config, Links},
    datetime,
    error::{Error, TemplateError},
    meeting::Meeting,
    paths::PathOf,
    template::Template,
};

/// The links every document gets, unless the configuration overrides them.
const DEFAULT_LINKS: &[(&str, &str)] = &[
    (
        "calendar",
        "https://calendar.google.com/calendar/embed?src=linuxfoundation.org_ik79t9uuj2p32i3r203dgv5mo8%40group.calendar.google.com",
    ),
    (
        "google calendar",
        "https://calendar.google.com/calendar?cid=bGludXhmb3VuZGF0aW9uLm9yZ19pazc5dDl1dWoycDMyaTNyMjAzZGd2NW1vOEBncm91cC5jYWxlbmRhci5nb29nbGUuY29t",
    ),
    (
        "ical file",
        "https://calendar.google.com/calendar/ical/linuxfoundation.org_ik79t9uuj2p32i3r203dgv5mo8%40group.calendar.google.com/public/basic.ics",
    ),
];

const NOTICE_RULE: &'static str = "\
| ---------------------------------------------------------------------------------------- |
";

const DATE_NOTES: &'static str = "  \
  - View the [calendar][], or subscribe ([Google Calendar][], [ical file][]).
  - _Please Note:_ The date or time may change. Please check this agenda the
    week of the meeting to confirm. While we try to keep all calendars accurate,
    this agenda document is the source of truth.
";

const PREAMBLE: &'static str = "\
1. Agree to Membership Agreement, Participation & Contribution Guidelines and Code of Conduct (1m, Host)
   - [Specification Membership Agreement](https://github.com/graphql/foundation)
   - [Participation Guidelines](https://github.com/graphql/graphql-wg#participation-guidelines)
   - [Contribution Guide](https://github.com/graphql/graphql-spec/blob/main/CONTRIBUTING.md)
   - [Code of Conduct](https://github.com/graphql/foundation/blob/master/CODE-OF-CONDUCT.md)
1. Introduction of attendees (5m, Host)
1. Determine volunteers for note taking (1m, Host)
1. Review agenda (2m, Host)
";

/// Renders the agenda document for one meeting.
///
/// `priors` are the secondary meetings since the last primary meeting. They
/// are only listed when `meeting` is itself primary. `how_to_join` is the
/// text following the `## How to join` heading of the configured joining
/// instructions, if it was read.
///
/// Every interpolated value must be present. The only things allowed to be
/// absent are the optional sections: the how to join comment, the file
/// mentioned in the notice, the description, the live notes line, the prior
/// meetings and a custom agenda bottom.
pub fn render<P: PathOf>(
    config: &Config,
    meeting: &Meeting,
    priors: &[Meeting],
    how_to_join: Option<&str>,
    paths: &P,
) -> Result<String, Error> {
    let line = datetime::render(config, meeting)?;
    let links = link_table(config);
    let joining = config.joining_a_meeting_file.as_deref();
    let repo_url = config.repo_url.as_deref();

    let template = Template::new()
        .when(how_to_join, |t, text| {
            t.lit("<!--\n\n# How to join (copied directly from /")
                .value("joiningAMeetingFile", joining)
                .lit(")\n\n")
                .value("howToJoin", Some(text))
                .lit("\n\n-->\n\n")
        })
        .lit("| This is an open meeting: To attend, ")
        .when(joining, |t, file| {
            t.lit("read [").value("joiningAMeetingFile", Some(file)).lit("][] then ")
        })
        .lit("edit and PR this file. (Edit: ✎ above, or press \"e\") |\n")
        .lit(NOTICE_RULE)
        .lit("\n# ")
        .value("name", Some(&*meeting.name))
        .lit("\n\n")
        .when(meeting.description.as_deref(), |t, description| {
            t.value("description", Some(description)).lit("\n\n")
        })
        .lit("- **Date & Time**: [")
        .value("dateAndTime", Some(line.human_range))
        .lit("](")
        .value("dateAndTimeLink", Some(line.deep_link))
        .lit(")\n")
        .lit(DATE_NOTES)
        .lit("- **Video Conference Link**: ")
        .value(
            "videoConferenceDetails",
            Some(&*config.video_conference_details),
        )
        .lit("\n")
        .when(config.live_notes_url.as_deref(), |t, _| {
            t.lit("- **Live Notes**: [Live Notes][]\n")
        })
        .lit("\n")
        .join(links.iter(), "\n", |t, (label, url)| {
            t.lit("[")
                .lit(label)
                .lit("]: ")
                .value(format!("links.{label}"), url)
        })
        .lit("\n\n## Attendees\n\n<!-- prettier-ignore -->\n")
        .value("attendeesTemplate", Some(&*config.attendees_template))
        .lit("\n\n## Agenda\n\n")
        .lit(PREAMBLE)
        .when(
            (meeting.primary && !priors.is_empty()).then_some(priors),
            |t, priors| {
                t.lit("1. Review prior secondary meetings (5m, Host)\n")
                    .join(priors, "\n", |t, prior| {
                        t.lit("   - [")
                            .value("priorMeeting.name", Some(&*prior.name))
                            .lit("](")
                            .value("repoUrl", paths.path_of(prior).url)
                            .lit(")")
                    })
                    .lit("\n")
            },
        );
    let template = match config.agenda_template_bottom.as_deref() {
        Some(bottom) => template.value("agendaTemplateBottom", Some(bottom)),
        None => template
            .lit("1. Review previous meeting's action items (5m, Host)\n")
            .lit("   - [Ready for review](")
            .value("repoUrl", repo_url)
            .lit(
                "/issues?q=is%3Aissue+is%3Aopen+label%3A%22Ready+for+review\
                 +%F0%9F%99%8C%22+sort%3Aupdated-desc)\n",
            )
            .lit("   - [All open action items (by last update)](")
            .value("repoUrl", repo_url)
            .lit(
                "/issues?q=is%3Aissue+is%3Aopen+label%3A%22Action+item\
                 +%3Aclapper%3A%22+sort%3Aupdated-desc)\n",
            ),
    };
    let rendered = template.render().map_err(|missing| TemplateError {
        placeholder: missing.placeholder,
        meeting: meeting.name.clone(),
    })?;
    Ok(rendered)
}

/// Merges the built in links with the configured ones.
///
/// Later entries replace earlier ones with the same label, while keeping its
/// position: the defaults, then `links`, then the joining instructions, then
/// the live notes.
fn link_table(config: &Config) -> Links {
    let mut links = Links::default();
    for &(label, url) in DEFAULT_LINKS {
        links.insert(label, Some(url.to_string()));
    }
    for (label, url) in config.links.iter() {
        links.insert(label, url.map(str::to_string));
    }
    if let Some(ref file) = config.joining_a_meeting_file {
        let url = config
            .repo_url
            .as_ref()
            .map(|repo| format!("{repo}/blob/main/{file}"));
        links.insert(file.clone(), url);
    }
    if let Some(ref url) = config.live_notes_url {
        links.insert("live notes", Some(url.clone()));
    }
    links
}
