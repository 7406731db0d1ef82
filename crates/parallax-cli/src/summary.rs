use std::path::Path;

use console::Style;
use parallax_core::session::ComparisonSession;
use parallax_core::view::{ViewState, Viewport};

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_export_summary(
    session: &ComparisonSession,
    view: ViewState,
    viewport: Viewport,
    out_dir: &Path,
) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Parallax Export"));
    println!("  {}", s.title.apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}"));
    println!();

    if let Some(info) = session.reference_info() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Reference"),
            s.path.apply_to(info.path.display())
        );
    }
    if let Some(info) = session.comparison_info() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Comparison"),
            s.path.apply_to(info.path.display())
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frame"),
        s.value
            .apply_to(format!("{} of {}", session.index(), session.effective_len()))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Viewport"),
        s.value
            .apply_to(format!("{}x{}", viewport.width, viewport.height))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Zoom"),
        s.value.apply_to(format!("{:.2}", view.zoom))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Pan"),
        s.value
            .apply_to(format!("({:.0}, {:.0})", view.pan_x, view.pan_y))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Rotation"),
        s.value.apply_to(format!("{}\u{b0}", view.rotation.degrees()))
    );
    if session.diff_enabled() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Diff"),
            s.method.apply_to("enabled")
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Diff"),
            s.disabled.apply_to("disabled")
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(out_dir.display())
    );
    println!();
}
