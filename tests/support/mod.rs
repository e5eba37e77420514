#![allow(dead_code)]

pub mod socket_guard;

/// Builds an xdcc.eu-shaped result page: header row plus the given data rows.
pub fn result_page(rows: &[[&str; 7]]) -> String {
    let mut html = String::from(
        "<html><body><table class=\"xdcc\">\
         <tr><th>Network</th><th>Channel</th><th>Bot</th><th>Pack</th>\
         <th>Gets</th><th>Size</th><th>Name</th></tr>",
    );
    for row in rows {
        html.push_str("<tr>");
        for (index, cell) in row.iter().enumerate() {
            if index == 1 {
                let channel = cell.trim_start_matches('#');
                html.push_str(&format!(
                    "<td> <a href=\"irc://irc.{}.net/{channel}\">{cell}</a> </td>",
                    row[0].to_ascii_lowercase()
                ));
            } else {
                html.push_str(&format!("<td>\n    {cell}\n  </td>"));
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</table></body></html>");
    html
}
