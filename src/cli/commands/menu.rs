use crate::services::BreakfastMenu;
use std::fmt::Write;

/// Render every breakfast menu with its steps and durations
pub fn render_menu() -> String {
    let mut output = String::new();

    for menu in BreakfastMenu::ALL {
        let _ = writeln!(
            output,
            "🍳 {} ({}s, {}s overlapped)",
            menu.display_name(),
            menu.total_duration().as_secs(),
            menu.overlapped_plan().duration().as_secs()
        );
        for (index, step) in menu.steps().iter().enumerate() {
            let _ = writeln!(
                output,
                "   {}. {} ({}s)",
                index + 1,
                step.description,
                step.duration.as_secs()
            );
        }
    }

    output
}

/// Execute the menu command
pub fn execute_menu() {
    print!("{}", render_menu());
}
