/// A purchasable membership package. Prices are in dalasi.
#[derive(Clone, Debug, PartialEq)]
pub struct MembershipPackage {
    pub id: &'static str,
    pub name: &'static str,
    /// `None` means unlimited sessions for the period.
    pub sessions: Option<u32>,
    pub price: f64,
    pub description: &'static str,
}

impl MembershipPackage {
    pub fn catalog() -> &'static [MembershipPackage] {
        &CATALOG
    }

    pub fn find(id: &str) -> Option<&'static MembershipPackage> {
        CATALOG.iter().find(|p| p.id == id)
    }
}

static CATALOG: [MembershipPackage; 4] = [
    MembershipPackage {
        id: "single-session",
        name: "Single Session",
        sessions: Some(1),
        price: 800.0,
        description: "One reformer class, valid for 30 days",
    },
    MembershipPackage {
        id: "5-sessions",
        name: "5 Sessions",
        sessions: Some(5),
        price: 3500.0,
        description: "Five reformer classes, valid for 60 days",
    },
    MembershipPackage {
        id: "10-sessions",
        name: "10 Sessions",
        sessions: Some(10),
        price: 6500.0,
        description: "Ten reformer classes, valid for 90 days",
    },
    MembershipPackage {
        id: "monthly-unlimited",
        name: "Monthly Unlimited",
        sessions: None,
        price: 9000.0,
        description: "Unlimited reformer classes for one month",
    },
];

/// How the member intends to pay. Payment itself is settled out of band;
/// choosing a method here creates the membership booking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentMethod {
    Wave,
    Afrimoney,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Wave => "wave",
            PaymentMethod::Afrimoney => "afrimoney",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "wave" => Some(PaymentMethod::Wave),
            "afrimoney" => Some(PaymentMethod::Afrimoney),
            "bank_transfer" | "bank-transfer" | "bank" => Some(PaymentMethod::BankTransfer),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Wave => "Wave",
            PaymentMethod::Afrimoney => "Afrimoney",
            PaymentMethod::BankTransfer => "Bank Transfer",
        }
    }

    /// Instructions shown alongside the booking reference once a method
    /// is chosen.
    pub fn instructions(&self) -> &'static str {
        match self {
            PaymentMethod::Wave => {
                "Send the amount via Wave to +220 555 0199 and quote your booking reference."
            }
            PaymentMethod::Afrimoney => {
                "Send the amount via Afrimoney to +220 555 0188 and quote your booking reference."
            }
            PaymentMethod::BankTransfer => {
                "Transfer the amount to Studio Reform, Trust Bank account 110-400276-01, reference your booking number."
            }
        }
    }
}
