use crate::api::Salary;

/// Collapse an hh.ru salary range to a single integer.
///
/// Returns the lower bound when it is present and non-zero, else the upper
/// bound under the same rule, else `None`.
pub fn normalize_salary(salary: Option<&Salary>) -> Option<i32> {
    let salary = salary?;
    salary
        .from
        .filter(|v| *v != 0)
        .or_else(|| salary.to.filter(|v| *v != 0))
}
