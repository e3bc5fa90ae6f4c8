use crate::services::feedback::FeedbackOption;
use crate::services::student::Student;

/// Assembles the instruction for one student: the custom prompt, the student line, then the
/// text of every selected option in option-list order. Stale selections are ignored.
pub fn build_prompt(custom_prompt: &str, student: &Student, options: &[FeedbackOption]) -> String {
    let descriptions = options
        .iter()
        .filter(|option| student.is_selected(option.id))
        .map(FeedbackOption::prompt_text)
        .collect::<Vec<_>>()
        .join(" ");

    format!("{} Provide feedback for {}. {}", custom_prompt, student.name, descriptions)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_with(name: &str, selected: &[u64]) -> Student {
        let mut student = Student::new(name);
        for id in selected {
            student.selected.insert(*id, true);
        }
        student
    }

    #[test]
    fn test_single_selected_option() {
        let option = FeedbackOption::new("Too Short", "Expand on your ideas.");
        let student = student_with("Sam", &[option.id]);

        let prompt = build_prompt("Be encouraging.", &student, &[option]);

        assert_eq!(prompt, "Be encouraging. Provide feedback for Sam. Expand on your ideas.");
    }

    #[test]
    fn test_no_selection() {
        let option = FeedbackOption::new("Too Short", "Expand on your ideas.");
        let student = student_with("Sam", &[]);

        let prompt = build_prompt("Be encouraging.", &student, &[option]);

        assert_eq!(prompt, "Be encouraging. Provide feedback for Sam.");
    }

    #[test]
    fn test_empty_custom_prompt_is_trimmed() {
        let student = student_with("Sam", &[]);
        assert_eq!(build_prompt("", &student, &[]), "Provide feedback for Sam.");
    }

    #[test]
    fn test_label_used_when_description_empty() {
        let option = FeedbackOption::new("Great structure", "");
        let student = student_with("Ana", &[option.id]);

        let prompt = build_prompt("Be brief.", &student, &[option]);

        assert_eq!(prompt, "Be brief. Provide feedback for Ana. Great structure");
    }

    #[test]
    fn test_option_order_wins_over_selection_order() {
        let first = FeedbackOption::new("First", "One.");
        let second = FeedbackOption::new("Second", "Two.");
        let student = student_with("Lee", &[second.id, first.id]);

        let prompt = build_prompt("P.", &student, &[first, second]);

        assert_eq!(prompt, "P. Provide feedback for Lee. One. Two.");
    }

    #[test]
    fn test_unchecked_and_stale_selections_ignored() {
        let kept = FeedbackOption::new("Kept", "Kept text.");
        let unchecked = FeedbackOption::new("Unchecked", "Unchecked text.");
        let mut student = student_with("Kim", &[kept.id, 424242]);
        student.selected.insert(unchecked.id, false);

        let prompt = build_prompt("P.", &student, &[kept, unchecked]);

        assert_eq!(prompt, "P. Provide feedback for Kim. Kept text.");
    }
}
