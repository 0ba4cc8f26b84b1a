//! Rendering of the search page as HTML (server) and plain text (terminal).
//!
//! Both renderers follow the same rules:
//!
//! - Loading shows [`MAX_CARDS`] skeleton cards
//! - Results show at most [`MAX_CARDS`] cards, in upstream order
//! - No results show [`NO_RESULTS_MESSAGE`]
//! - An error shows the banner above whatever else is on the page

use crate::models::NewsItem;
use crate::page::{MAX_CARDS, SearchPage, View};
use crate::utils::{escape_html, format_pub_date, safe_link};
use urlencoding::encode;

pub const PAGE_TITLE: &str = "Portal de Notícias";
pub const NO_RESULTS_MESSAGE: &str = "Nenhuma notícia encontrada. Tente outra pesquisa.";
pub const SEARCH_PLACEHOLDER: &str = "Pesquisar notícias (ex: política, esportes, tecnologia)";
pub const IMAGE_UNAVAILABLE: &str = "Imagem não disponível";

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#fafafa;color:#111}\
main{max-width:72rem;margin:0 auto;padding:2rem 1rem}\
h1{text-align:center}\
form{display:flex;gap:.5rem;max-width:36rem;margin:0 auto 2rem}\
form input{flex:1;padding:.5rem}\
.error-banner{background:#fee2e2;border:1px solid #f87171;color:#b91c1c;padding:.75rem 1rem;border-radius:.25rem;margin-bottom:1.5rem}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(18rem,1fr));gap:1.5rem}\
.card{background:#fff;border:1px solid #e5e5e5;border-radius:.5rem;padding:1rem;display:flex;flex-direction:column}\
.card img{width:100%;aspect-ratio:16/9;object-fit:cover;border-radius:.375rem}\
.skeleton{height:400px;background:linear-gradient(90deg,#eee,#f5f5f5,#eee)}\
.source,.published{color:#666;font-size:.8rem}\
.no-results{text-align:center;padding:3rem 0;color:#666}\
footer{border-top:1px solid #e5e5e5;text-align:center;color:#666;padding:2rem 1rem}";

/// URL of the generated placeholder image.
pub fn placeholder_url(text: Option<&str>) -> String {
    match text {
        Some(text) => format!("/placeholder.svg?height=200&width=400&text={}", encode(text)),
        None => "/placeholder.svg?height=200&width=400".to_string(),
    }
}

/// Render the full HTML document for `page`.
pub fn render_html(page: &SearchPage) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{PAGE_TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<main>\n"));
    html.push_str(&format!("<h1>{PAGE_TITLE}</h1>\n"));

    html.push_str(&format!(
        "<form method=\"get\" action=\"/\">\
         <input type=\"text\" name=\"q\" placeholder=\"{}\" value=\"{}\">\
         <button type=\"submit\">Buscar</button></form>\n",
        escape_html(SEARCH_PLACEHOLDER),
        escape_html(page.search_term()),
    ));

    if let Some(error) = page.error() {
        html.push_str(&format!("<div class=\"error-banner\" role=\"alert\">{}</div>\n", escape_html(error)));
    }

    let busy = page.is_loading();
    match page.view() {
        View::Loading => {
            html.push_str(&format!("<div class=\"grid\" aria-busy=\"{busy}\">\n"));
            for _ in 0..MAX_CARDS {
                html.push_str("<div class=\"card skeleton\" aria-hidden=\"true\"></div>\n");
            }
            html.push_str("</div>\n");
        }
        View::Results(items) => {
            html.push_str(&format!("<div class=\"grid\" aria-busy=\"{busy}\">\n"));
            for item in items {
                html.push_str(&render_card(item));
            }
            html.push_str("</div>\n");
        }
        View::Empty => {
            html.push_str(&format!("<div class=\"no-results\"><p>{NO_RESULTS_MESSAGE}</p></div>\n"));
        }
    }

    html.push_str("</main>\n");
    html.push_str(FOOTER_HTML);
    html.push_str("</body>\n</html>\n");
    html
}

fn render_card(item: &NewsItem) -> String {
    let fallback = placeholder_url(Some(IMAGE_UNAVAILABLE));
    let src = item
        .image()
        .map(str::to_string)
        .unwrap_or_else(|| placeholder_url(None));

    format!(
        "<article class=\"card news-card\">\
         <h2>{title}</h2>\
         <p class=\"source\">{source}</p>\
         <img src=\"{src}\" alt=\"{title}\" loading=\"lazy\" \
         onerror=\"this.onerror=null;this.src='{fallback}'\">\
         <p class=\"summary\">{summary}</p>\
         <a href=\"{link}\" target=\"_blank\" rel=\"noopener noreferrer\">Ler matéria completa</a>\
         <p class=\"published\">Publicado em: {published}</p>\
         </article>\n",
        title = escape_html(&item.title),
        source = escape_html(&item.source_id),
        src = escape_html(&src),
        fallback = escape_html(&fallback),
        summary = escape_html(item.summary()),
        link = escape_html(safe_link(&item.link)),
        published = escape_html(&format_pub_date(&item.pub_date)),
    )
}

const FOOTER_HTML: &str = "<footer>\
<p>Criado pela turma de Análise e Desenvolvimento de Sistemas - Celso Lisboa RJ</p>\
<p><small>© 2025 Todos os direitos reservados</small></p>\
</footer>\n";

/// Render `page` as plain text for the terminal client.
pub fn render_text(page: &SearchPage) -> String {
    let mut out = format!("== {PAGE_TITLE} ==\n");

    if let Some(error) = page.error() {
        out.push_str(&format!("[!] {error}\n"));
    }

    if page.is_loading() {
        out.push_str("Carregando notícias...\n");
    }

    match page.view() {
        View::Loading => {
            for _ in 0..MAX_CARDS {
                out.push_str("  ░░░░░░░░░░░░░░░░░░░░\n");
            }
        }
        View::Results(items) => {
            out.push_str(&format!("{} de {} notícias\n", items.len(), page.results().len()));
            for (i, item) in items.iter().enumerate() {
                out.push_str(&format!(
                    "{n}. {title} ({source})\n   {summary}\n   {link}\n   Publicado em: {published}\n",
                    n = i + 1,
                    title = item.title,
                    source = item.source_id,
                    summary = item.summary(),
                    link = item.link,
                    published = format_pub_date(&item.pub_date),
                ));
            }
        }
        View::Empty => {
            out.push_str(NO_RESULTS_MESSAGE);
            out.push('\n');
        }
    }
    out
}
