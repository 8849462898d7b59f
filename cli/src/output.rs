//! Plain-text rendering of API responses.

use crate::api::{Complaint, Location, LoginResponse, Student};

pub fn print_login(login: &LoginResponse) {
    println!("Logged in as {} ({})", login.user.name, login.user.role);
    println!();
    println!("export COMPLAINTS_TOKEN={}", login.token);
}

pub fn print_complaint_table(complaints: &[Complaint], total: usize) {
    if complaints.is_empty() {
        println!("No complaints");
        return;
    }

    println!(
        "{:<36}  {:<20}  {:<22}  {:<22}  {}",
        "ID", "STATUS", "STUDENT", "TEACHER", "DESCRIPTION"
    );
    for complaint in complaints {
        let student = complaint
            .student
            .as_ref()
            .map(|s| format!("{} {}", s.first_name, s.last_name))
            .unwrap_or_else(|| "?".into());
        let teacher = complaint
            .teacher
            .as_ref()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "?".into());

        println!(
            "{:<36}  {:<20}  {:<22}  {:<22}  {}",
            complaint.id,
            complaint.status,
            student,
            teacher,
            truncate(&complaint.incident.description, 48)
        );
    }
    println!();
    println!("{} total", total);
}

pub fn print_complaint(complaint: &Complaint) {
    println!("Complaint {}", complaint.id);
    println!("  Status:    {}", complaint.status);

    if let Some(student) = &complaint.student {
        println!(
            "  Student:   {} {} ({})",
            student.first_name, student.last_name, student.student_number
        );
    }
    if let Some(teacher) = &complaint.teacher {
        println!("  Teacher:   {}", teacher.name);
    }

    println!("  Date:      {}", complaint.incident.date.to_rfc3339());
    if let Some(location) = &complaint.incident.location {
        println!("  Location:  {}", location.name);
    }
    println!("  What:      {}", complaint.incident.description);

    for person in &complaint.incident.involved_people {
        let name = person
            .user
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_else(|| person.user_id.to_string());
        match &person.role {
            Some(role) => println!("  Involved:  {} ({})", name, role),
            None => println!("  Involved:  {}", name),
        }
    }

    if let Some(submitted_at) = complaint.submitted_at {
        println!("  Submitted: {}", submitted_at.to_rfc3339());
    }

    if let Some(decision) = &complaint.decision {
        println!();
        println!("  Decision:  {}", decision.punishment);
        if let Some(notes) = &decision.notes {
            println!("  Notes:     {}", notes);
        }
        println!("  Decided:   {}", decision.decided_at.to_rfc3339());
    }

    println!();
    println!("  History:");
    for entry in &complaint.history {
        match &entry.notes {
            Some(notes) => println!(
                "    {}  {:<10} {}",
                entry.timestamp.to_rfc3339(),
                entry.action,
                notes
            ),
            None => println!("    {}  {}", entry.timestamp.to_rfc3339(), entry.action),
        }
    }
}

pub fn print_students(students: &[Student]) {
    if students.is_empty() {
        println!("No students");
        return;
    }

    println!(
        "{:<36}  {:<10}  {:<22}  {:<6}  {}",
        "ID", "NUMBER", "NAME", "GRADE", "CLASS"
    );
    for student in students {
        println!(
            "{:<36}  {:<10}  {:<22}  {:<6}  {}",
            student.id,
            student.student_number,
            format!("{} {}", student.first_name, student.last_name),
            student.grade,
            student.class
        );
    }
}

pub fn print_locations(locations: &[Location]) {
    if locations.is_empty() {
        println!("No locations");
        return;
    }

    println!("{:<36}  {:<28}  {}", "ID", "NAME", "DESCRIPTION");
    for location in locations {
        println!(
            "{:<36}  {:<28}  {}",
            location.id,
            location.name,
            location.description.as_deref().unwrap_or("")
        );
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate("short", 48), "short");
    }

    #[test]
    fn truncate_cuts_long_text_with_ellipsis() {
        let long = "x".repeat(60);
        let cut = truncate(&long, 48);
        assert_eq!(cut.chars().count(), 48);
        assert!(cut.ends_with("..."));
    }
}
