//! Pure translations between the record and its wire shapes.

use uuid::Uuid;

use super::domain::{Customer, CustomerInput, CustomerView};

pub fn to_view(customer: Customer) -> CustomerView {
    CustomerView {
        id: customer.id,
        first_name: customer.first_name,
        last_name: customer.last_name,
        email: customer.email,
    }
}

/// Build a record for `id`; the input's own id is not consulted.
pub fn to_record(id: Uuid, input: CustomerInput) -> Customer {
    Customer {
        id,
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
    }
}

/// Overwrite every mutable field of `customer` with the input's values.
pub fn merge(customer: &mut Customer, input: CustomerInput) {
    customer.first_name = input.first_name;
    customer.last_name = input.last_name;
    customer.email = input.email;
}

impl From<Customer> for CustomerView {
    fn from(customer: Customer) -> Self { to_view(customer) }
}

impl From<models::customer::Model> for Customer {
    fn from(m: models::customer::Model) -> Self {
        Customer { id: m.id, first_name: m.first_name, last_name: m.last_name, email: m.email }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(id: Option<Uuid>) -> CustomerInput {
        CustomerInput {
            id,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
        }
    }

    #[test]
    fn record_takes_given_id_not_input_id() {
        let given = Uuid::new_v4();
        let record = to_record(given, input(Some(Uuid::new_v4())));
        assert_eq!(record.id, given);
        assert_eq!(record.email, "ada@example.com");
    }

    #[test]
    fn merge_keeps_id() {
        let id = Uuid::new_v4();
        let mut record = to_record(id, input(None));
        merge(
            &mut record,
            CustomerInput {
                id: Some(Uuid::new_v4()),
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
                email: "grace@example.com".into(),
            },
        );
        assert_eq!(record.id, id);
        assert_eq!(record.first_name, "Grace");
        assert_eq!(record.last_name, "Hopper");
        assert_eq!(record.email, "grace@example.com");
    }
}
