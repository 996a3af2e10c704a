use crate::model::User;

/// Case-sensitive substring match against every string field of `user`.
/// An empty term matches everything.
pub fn matches_search(user: &User, term: &str) -> bool {
    term.is_empty() || user.string_fields().any(|s| s.contains(term))
}

pub fn filter_users<'a>(users: &'a [User], term: &str) -> Vec<&'a User> {
    users.iter().filter(|u| matches_search(u, term)).collect()
}

/// Number of pages needed for `filtered` rows: the quotient, plus one for a partial page.
pub fn page_count(filtered: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    let full = filtered / size;
    if filtered % size != 0 { full + 1 } else { full }
}

/// Rows of the 1-based `page_index`. Out-of-range pages are empty.
pub fn page_slice<T>(items: &[T], page_index: usize, page_size: usize) -> &[T] {
    let size = page_size.max(1);
    if page_index == 0 {
        return &[];
    }
    let start = (page_index - 1).saturating_mul(size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Position, Status, UserId};

    fn mk_user(id: i64, firstname: &str, name: &str, email: &str) -> User {
        User {
            id: Some(UserId::Number(id)),
            firstname: firstname.to_string(),
            name: name.to_string(),
            telephone: format!("555{id}"),
            email: email.to_string(),
            status: Status::Active,
            role: "Support".to_string(),
            position: Position::Developer,
            published: None,
        }
    }

    #[test]
    fn search_is_case_sensitive_substring() {
        let users = vec![
            mk_user(1, "Alice", "Smith", "alice@example.com"),
            mk_user(2, "Bob", "Jones", "bob@example.com"),
        ];
        let hits = filter_users(&users, "li");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].firstname, "Alice");

        assert!(filter_users(&users, "BOB").is_empty());
        assert_eq!(filter_users(&users, "Jo").len(), 1);
    }

    #[test]
    fn search_ignores_numeric_fields() {
        let users = vec![mk_user(42, "Ann", "Lee", "ann@x.io")];
        // id 42 is numeric; telephone "55542" is a string and does match
        assert_eq!(filter_users(&users, "42").len(), 1);
        // status code 1 and position code 2 are not searched
        let mut u = mk_user(3, "Cy", "Ro", "c@r.io");
        u.telephone = "000".into();
        assert!(!matches_search(&u, "3"));
    }

    #[test]
    fn search_matches_role_string() {
        let users = vec![mk_user(1, "Ann", "Lee", "a@x.io")];
        assert_eq!(filter_users(&users, "Supp").len(), 1);
    }

    #[test]
    fn empty_term_matches_all() {
        let users = vec![mk_user(1, "A", "B", "a@b.c"), mk_user(2, "C", "D", "c@d.e")];
        assert_eq!(filter_users(&users, "").len(), 2);
    }

    #[test]
    fn page_count_rounds_partial_pages_up() {
        assert_eq!(page_count(0, 3), 0);
        assert_eq!(page_count(3, 3), 1);
        assert_eq!(page_count(4, 3), 2);
        assert_eq!(page_count(9, 9), 1);
        assert_eq!(page_count(10, 9), 2);
    }

    #[test]
    fn page_slice_bounds() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(page_slice(&items, 1, 2), &[1, 2]);
        assert_eq!(page_slice(&items, 3, 2), &[5]);
        assert!(page_slice(&items, 4, 2).is_empty());
        assert!(page_slice(&items, 0, 2).is_empty());
    }
}
