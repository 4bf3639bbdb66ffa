//! Status page templating.
//!
//! The page is a single HTML document with the system name, the current
//! mode and a table of alarm activations. It also carries a mode selection
//! form; the server has no routes, so submitting it only fetches the page
//! again.
//!
//! Every line of the response, headers and body, ends with CRLF.

use genjen_controller::StateStore;
use genjen_core::AlarmRecord;
use genjen_core::constants::{LABEL_ALARM, LABEL_ARMED};

/// Line terminator used throughout the response.
pub const CRLF: &str = "\r\n";

/// Response header lines, without terminators.
pub const RESPONSE_HEADERS: [&str; 3] = [
    "HTTP/1.1 200 OK",
    "Content-Type: text/html",
    "Connection: close",
];

/// One row of the alarm table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmRow {
    pub label: String,
    pub time: String,
    pub date: String,
}

impl From<&AlarmRecord> for AlarmRow {
    fn from(record: &AlarmRecord) -> Self {
        Self {
            label: LABEL_ALARM.to_string(),
            time: record.time_label(),
            date: record.date_label(),
        }
    }
}

/// Everything the page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    /// Label shown after "Aktuel tilstand:".
    pub mode_label: String,

    /// Alarm table rows, top to bottom.
    pub alarms: Vec<AlarmRow>,
}

impl StatusView {
    /// The fixed page: always "Aktiveret", with a single example alarm row.
    pub fn fixed() -> Self {
        Self {
            mode_label: LABEL_ARMED.to_string(),
            alarms: vec![AlarmRow {
                label: LABEL_ALARM.to_string(),
                time: "10:00".to_string(),
                date: "27/1/2023".to_string(),
            }],
        }
    }

    /// The published mode and alarm log, newest alarm first.
    pub async fn live(store: &StateStore) -> Self {
        Self {
            mode_label: store.indication().label.to_string(),
            alarms: store.alarms().await.iter().map(AlarmRow::from).collect(),
        }
    }
}

/// Render the HTML document for `view`.
///
/// # Examples
///
/// ```
/// use genjen_network::{StatusView, render_status_page};
///
/// let page = render_status_page(&StatusView::fixed());
///
/// assert!(page.starts_with("<!DOCTYPE HTML>\r\n"));
/// assert!(page.contains("<h2 style=' display: inline;'> Aktiveret </h2>"));
/// assert!(page.ends_with("</html>\r\n"));
/// ```
pub fn render_status_page(view: &StatusView) -> String {
    let mut lines: Vec<String> = [
        "<!DOCTYPE HTML>",
        "<html>",
        "<head>",
        "<style>",
        "* {",
        "margin: 0;",
        "padding: 0;",
        "}",
        "</style>",
        "</head>",
        "<body style='background-color: whitesmoke'>",
        "<div style='padding: 10px; background-color: mediumseagreen; text-align: center;'>",
        "<h1>GenJen</h1>",
        "<h1>Security System</h1>",
        "</div>",
        "<div style='width: 50%; margin: auto; text-align: center;'>",
        "<br><br>",
        "<h2 style='display: inline;'> Aktuel tilstand: </h2>",
    ]
    .map(String::from)
    .to_vec();

    lines.push(format!(
        "<h2 style=' display: inline;'> {} </h2>",
        view.mode_label
    ));

    lines.extend(
        [
            "<br><br>",
            "<form method='POST' action='/test'>",
            "<label for='tilstand'>Vælg tilstand</label>",
            "<select name='tilstand'>",
            "<option value='0'>Aktiveret</option>",
            "<option value='1'>Deaktiveret</option>",
            "<option value='2'>Alarm</option>",
            "</select>",
            "<input type='submit' value='Submit'>",
            "</form> ",
            "<br><br>",
            "<table style='border: 1px solid; font-size: xx-large; margin: auto;'>",
            "<tr>",
            "<th colspan='3'>Alameringer</th>",
            "</tr>",
        ]
        .map(String::from),
    );

    for row in &view.alarms {
        lines.push("<tr>".to_string());
        for cell in [&row.label, &row.time, &row.date] {
            lines.push(format!("<td style='padding-right:10px;'>{}</td>", cell));
        }
        lines.push("</tr>".to_string());
    }

    lines.extend(
        ["</table>", "</div>", "</body>", "</html>"].map(String::from),
    );

    let mut page = lines.join(CRLF);
    page.push_str(CRLF);
    page
}

/// Render the complete HTTP response: status line, headers, blank line and
/// the status page.
pub fn render_response(view: &StatusView) -> String {
    let mut response = RESPONSE_HEADERS.join(CRLF);
    response.push_str(CRLF);
    response.push_str(CRLF);
    response.push_str(&render_status_page(view));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use genjen_core::SecurityMode;

    #[test]
    fn test_fixed_page_alarm_row() {
        let page = render_status_page(&StatusView::fixed());

        let expected = [
            "<tr>",
            "<td style='padding-right:10px;'>Alarm</td>",
            "<td style='padding-right:10px;'>10:00</td>",
            "<td style='padding-right:10px;'>27/1/2023</td>",
            "</tr>",
            "</table>",
        ]
        .join(CRLF);
        assert!(page.contains(&expected));
        assert!(page.contains("<th colspan='3'>Alameringer</th>"));
    }

    #[test]
    fn test_every_line_ends_with_crlf() {
        let response = render_response(&StatusView::fixed());

        assert!(response.ends_with(CRLF));
        for line in response.split_inclusive('\n') {
            assert!(line.ends_with(CRLF), "line {line:?} lacks CRLF");
        }
    }

    #[test]
    fn test_response_head() {
        let response = render_response(&StatusView::fixed());

        assert!(response.starts_with(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n<!DOCTYPE HTML>\r\n"
        ));
    }

    #[test]
    fn test_empty_alarm_table() {
        let view = StatusView {
            mode_label: "Deaktiveret".to_string(),
            alarms: Vec::new(),
        };

        let page = render_status_page(&view);

        assert!(page.contains("> Deaktiveret </h2>"));
        assert!(page.contains("</tr>\r\n</table>"));
        assert!(!page.contains("<td"));
    }

    #[tokio::test]
    async fn test_live_view() {
        let store = StateStore::new(SecurityMode::Armed);
        store.force_raw(SecurityMode::Disarmed.to_u8());

        let view = StatusView::live(&store).await;

        assert_eq!(view.mode_label, "Deaktiveret");
        assert!(view.alarms.is_empty());
    }

    #[test]
    fn test_alarm_row_from_record() {
        let record = AlarmRecord {
            raised_at: Local.with_ymd_and_hms(2024, 3, 5, 7, 30, 0).unwrap(),
        };

        let row = AlarmRow::from(&record);

        assert_eq!(row.label, "Alarm");
        assert_eq!(row.time, "07:30");
        assert_eq!(row.date, "5/3/2024");
    }
}
