/// Moves the host away from the form once a submission is done.
pub trait Navigator {
    fn navigate(&self, target: &str);
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn navigate(&self, target: &str) {
        (**self).navigate(target);
    }
}
